use chrono::{Duration, NaiveDateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;
use crate::models::session::Session;

pub async fn create_session(
    pool: &SqlitePool,
    user_id: i64,
    ttl: Duration,
) -> Result<Session, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let session = Session {
        session_id: Uuid::new_v4().to_string(),
        user_id,
        expires_at: now + ttl,
        created_at: now,
    };

    sqlx::query(
        "INSERT INTO sessions (session_id, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&session.session_id)
    .bind(session.user_id)
    .bind(session.expires_at)
    .bind(session.created_at)
    .execute(pool)
    .await?;

    Ok(session)
}

pub async fn find_session(pool: &SqlitePool, session_id: &str) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        "SELECT session_id, user_id, expires_at, created_at FROM sessions WHERE session_id = ?",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_session(pool: &SqlitePool, session_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE session_id = ?")
        .bind(session_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_expired_sessions_for_user(
    pool: &SqlitePool,
    user_id: i64,
    now: NaiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = ? AND expires_at <= ?")
        .bind(user_id)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
