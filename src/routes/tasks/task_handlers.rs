use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{error, info};
use sqlx::SqlitePool;
use crate::auth;
use crate::models::{task::TaskChanges, user::User};
use crate::routes::{ErrorResponse, MessageResponse};
use crate::services::task_service;
use super::task_models::{
    CreateTaskRequest, UpdateTaskRequest,
    ToggleCompleteRequest, TaskListQuery,
};

// Authentication first, then the path owner must be the caller.
// The task table is never consulted before this passes.
async fn authorize_owner(
    pool: &SqlitePool,
    req: &HttpRequest,
    user_id: i64,
    action: &str,
) -> Result<User, HttpResponse> {
    let current_user = auth::current_user(pool, req)
        .await
        .map_err(|failure| failure.into_response())?;

    if current_user.id != user_id {
        info!("User {} tried to access tasks of user {}", current_user.id, user_id);
        return Err(HttpResponse::Forbidden().json(ErrorResponse::new(format!(
            "Not authorized to {} tasks for this user",
            action
        ))));
    }
    Ok(current_user)
}

fn task_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Task not found"))
}

fn database_error(context: &str, e: sqlx::Error) -> HttpResponse {
    error!("Failed to {}: {}", context, e);
    HttpResponse::InternalServerError().json(ErrorResponse::new("Internal server error"))
}

pub async fn create_task(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CreateTaskRequest>,
) -> impl Responder {
    let user_id = path.into_inner();
    if let Err(response) = authorize_owner(pool.get_ref(), &req, user_id, "create").await {
        return response;
    }
    if let Err(detail) = request.validate() {
        return HttpResponse::UnprocessableEntity().json(ErrorResponse::new(detail));
    }

    let request = request.into_inner();
    match task_service::create_task(
        pool.get_ref(),
        user_id,
        &request.title,
        request.description.as_deref(),
    )
    .await
    {
        Ok(task) => {
            info!("Task {} created for user {}", task.id, user_id);
            HttpResponse::Ok().json(task)
        }
        Err(e) => database_error("create task", e),
    }
}

pub async fn list_tasks(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<TaskListQuery>,
) -> impl Responder {
    let user_id = path.into_inner();
    if let Err(response) = authorize_owner(pool.get_ref(), &req, user_id, "access").await {
        return response;
    }

    match task_service::get_tasks_by_user(pool.get_ref(), user_id, query.completed).await {
        Ok(tasks) => HttpResponse::Ok().json(tasks),
        Err(e) => database_error("list tasks", e),
    }
}

pub async fn get_task(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> impl Responder {
    let (user_id, task_id) = path.into_inner();
    if let Err(response) = authorize_owner(pool.get_ref(), &req, user_id, "access").await {
        return response;
    }

    match task_service::get_task_by_id(pool.get_ref(), task_id, user_id).await {
        Ok(Some(task)) => HttpResponse::Ok().json(task),
        Ok(None) => task_not_found(),
        Err(e) => database_error("fetch task", e),
    }
}

pub async fn update_task(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    request: web::Json<UpdateTaskRequest>,
) -> impl Responder {
    let (user_id, task_id) = path.into_inner();
    if let Err(response) = authorize_owner(pool.get_ref(), &req, user_id, "update").await {
        return response;
    }
    if let Err(detail) = request.validate() {
        return HttpResponse::UnprocessableEntity().json(ErrorResponse::new(detail));
    }

    let request = request.into_inner();
    let changes = TaskChanges {
        title: request.title,
        description: request.description,
        completed: request.completed,
    };
    match task_service::update_task(pool.get_ref(), task_id, user_id, changes).await {
        Ok(Some(task)) => {
            info!("Task {} updated", task_id);
            HttpResponse::Ok().json(task)
        }
        Ok(None) => task_not_found(),
        Err(e) => database_error("update task", e),
    }
}

pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> impl Responder {
    let (user_id, task_id) = path.into_inner();
    if let Err(response) = authorize_owner(pool.get_ref(), &req, user_id, "delete").await {
        return response;
    }

    match task_service::delete_task(pool.get_ref(), task_id, user_id).await {
        Ok(true) => {
            info!("Task {} deleted", task_id);
            HttpResponse::Ok().json(MessageResponse {
                message: "Task deleted successfully".into(),
            })
        }
        Ok(false) => task_not_found(),
        Err(e) => database_error("delete task", e),
    }
}

pub async fn toggle_task_complete(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    request: web::Json<ToggleCompleteRequest>,
) -> impl Responder {
    let (user_id, task_id) = path.into_inner();
    if let Err(response) = authorize_owner(pool.get_ref(), &req, user_id, "update").await {
        return response;
    }

    match task_service::toggle_task_completion(pool.get_ref(), task_id, user_id, request.completed).await {
        Ok(Some(task)) => {
            info!("Task {} marked completed={}", task_id, task.completed);
            HttpResponse::Ok().json(task)
        }
        Ok(None) => task_not_found(),
        Err(e) => database_error("toggle task", e),
    }
}
