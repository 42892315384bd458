use actix_web::{error, web, HttpResponse};
use super::ErrorResponse;
use super::auth::auth_handlers;
use super::tasks::task_handlers;

/// Registers every route plus the extractor configs on one service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/", web::get().to(super::read_root))
        .configure(auth_configure)
        .configure(login_configure)
        .configure(tasks_configure);
}

// Malformed bodies and query strings are validation errors (422)
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::UnprocessableEntity().json(ErrorResponse::new(err.to_string()));
        error::InternalError::from_response(err, response).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::UnprocessableEntity().json(ErrorResponse::new(err.to_string()));
        error::InternalError::from_response(err, response).into()
    })
}

pub fn auth_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/signup", web::post().to(auth_handlers::signup))
    );
}

pub fn login_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/login", web::post().to(auth_handlers::login))
        .route("/api/logout", web::post().to(auth_handlers::logout));
}

pub fn tasks_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/{user_id}/tasks")
            .service(
                web::resource("")
                    .route(web::post().to(task_handlers::create_task))
                    .route(web::get().to(task_handlers::list_tasks)),
            )
            .service(
                web::resource("/{task_id}")
                    .route(web::get().to(task_handlers::get_task))
                    .route(web::put().to(task_handlers::update_task))
                    .route(web::delete().to(task_handlers::delete_task)),
            )
            .route("/{task_id}/complete", web::patch().to(task_handlers::toggle_task_complete))
    );
}
