use chrono::Utc;
use sqlx::SqlitePool;
use crate::models::task::{Task, TaskChanges};

const TASK_COLUMNS: &str = "id, title, description, user_id, completed, created_at, updated_at";

pub async fn create_task(
    pool: &SqlitePool,
    user_id: i64,
    title: &str,
    description: Option<&str>,
) -> Result<Task, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        "INSERT INTO tasks (title, description, user_id, completed, created_at, updated_at)
         VALUES (?, ?, ?, 0, ?, ?)",
    )
    .bind(title)
    .bind(description)
    .bind(user_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Task {
        id: result.last_insert_rowid(),
        title: title.to_string(),
        description: description.map(str::to_string),
        user_id,
        completed: false,
        created_at: now,
        updated_at: now,
    })
}

// Owner-scoped: a task of another user is indistinguishable from a missing one
pub async fn get_task_by_id(
    pool: &SqlitePool,
    task_id: i64,
    user_id: i64,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? AND user_id = ?"
    ))
    .bind(task_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Lists a user's tasks newest first, optionally only those whose
/// completion flag equals `completed`.
pub async fn get_tasks_by_user(
    pool: &SqlitePool,
    user_id: i64,
    completed: Option<bool>,
) -> Result<Vec<Task>, sqlx::Error> {
    match completed {
        Some(completed) => {
            sqlx::query_as::<_, Task>(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks
                 WHERE user_id = ? AND completed = ?
                 ORDER BY created_at DESC, id DESC"
            ))
            .bind(user_id)
            .bind(completed)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Task>(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks
                 WHERE user_id = ?
                 ORDER BY created_at DESC, id DESC"
            ))
            .bind(user_id)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn update_task(
    pool: &SqlitePool,
    task_id: i64,
    user_id: i64,
    changes: TaskChanges,
) -> Result<Option<Task>, sqlx::Error> {
    let mut task = match get_task_by_id(pool, task_id, user_id).await? {
        Some(task) => task,
        None => return Ok(None),
    };

    if let Some(title) = changes.title {
        task.title = title;
    }
    if let Some(description) = changes.description {
        task.description = Some(description);
    }
    if let Some(completed) = changes.completed {
        task.completed = completed;
    }
    task.updated_at = Utc::now().naive_utc();

    sqlx::query(
        "UPDATE tasks SET title = ?, description = ?, completed = ?, updated_at = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.completed)
    .bind(task.updated_at)
    .bind(task_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(Some(task))
}

pub async fn delete_task(pool: &SqlitePool, task_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
        .bind(task_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn toggle_task_completion(
    pool: &SqlitePool,
    task_id: i64,
    user_id: i64,
    completed: bool,
) -> Result<Option<Task>, sqlx::Error> {
    update_task(
        pool,
        task_id,
        user_id,
        TaskChanges {
            completed: Some(completed),
            ..TaskChanges::default()
        },
    )
    .await
}
