use chrono::Utc;
use sqlx::SqlitePool;
use crate::models::user::User;

const USER_COLUMNS: &str = "id, email, hashed_password, is_active, created_at, updated_at";

pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// True when `e` is the UNIQUE constraint on `users.email` firing.
pub fn is_duplicate_email(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    hashed_password: &str,
) -> Result<User, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        "INSERT INTO users (email, hashed_password, is_active, created_at, updated_at)
         VALUES (?, ?, 1, ?, ?)",
    )
    .bind(email)
    .bind(hashed_password)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(User {
        id: result.last_insert_rowid(),
        email: email.to_string(),
        hashed_password: hashed_password.to_string(),
        is_active: true,
        created_at: now,
        updated_at: now,
    })
}

pub async fn set_user_active(pool: &SqlitePool, user_id: i64, is_active: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(is_active)
        .bind(Utc::now().naive_utc())
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::db;

    #[tokio::test]
    async fn second_insert_of_an_email_is_a_duplicate() {
        let settings = Settings {
            database_url: "sqlite::memory:".to_string(),
            ..Settings::default()
        };
        let pool = db::connect(&settings).await.expect("Failed to open test DB");
        db::create_db_and_tables(&pool).await.expect("Failed to create schema");

        create_user(&pool, "twin@example.com", "hash").await.unwrap();
        let err = create_user(&pool, "twin@example.com", "hash").await.unwrap_err();
        assert!(is_duplicate_email(&err));
        assert!(!is_duplicate_email(&sqlx::Error::RowNotFound));
    }
}
