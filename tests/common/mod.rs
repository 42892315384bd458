#![allow(dead_code, unused_macros)]

use sqlx::SqlitePool;
use taskboard::{config::Settings, db};

pub fn test_settings() -> Settings {
    Settings {
        database_url: "sqlite::memory:".to_string(),
        bcrypt_cost: 4,
        ..Settings::default()
    }
}

pub async fn test_pool(settings: &Settings) -> SqlitePool {
    let pool = db::connect(settings).await.expect("Failed to open test DB");
    db::create_db_and_tables(&pool).await.expect("Failed to create schema");
    pool
}

/// Builds the full application around a pool and settings.
macro_rules! test_app {
    ($pool:expr, $settings:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($pool.clone()))
                .app_data(actix_web::web::Data::new($settings.clone()))
                .configure(taskboard::routes::routes::configure),
        )
        .await
    };
}

/// Signs up and logs in `email`, yielding `(user_id, access_token)`.
macro_rules! login {
    ($app:expr, $email:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(serde_json::json!({ "email": $email, "password": "correct horse" }))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let req = actix_web::test::TestRequest::post()
            .uri("/api/login")
            .set_json(serde_json::json!({ "email": $email, "password": "correct horse" }))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        let body: taskboard::routes::auth::auth_models::LoginResponse =
            actix_web::test::read_body_json(resp).await;
        (body.user.id, body.access_token)
    }};
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (actix_web::http::header::AUTHORIZATION, format!("Bearer {}", token))
}
