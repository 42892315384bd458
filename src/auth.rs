use actix_web::{http::header, HttpRequest, HttpResponse};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use log::{error, info};
use sqlx::SqlitePool;
use crate::models::{session::Session, user::User};
use crate::routes::ErrorResponse;
use crate::services::{session_service, user_service};

pub const SESSION_COOKIE: &str = "session_id";

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

// A malformed stored hash counts as a mismatch
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(password, hashed_password).unwrap_or(false)
}

/// Looks the user up by email and checks the password.
/// Returns `Ok(None)` for an unknown email or a wrong password alike.
pub async fn authenticate_user(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = match user_service::get_user_by_email(pool, email).await? {
        Some(user) => user,
        None => return Ok(None),
    };
    if !verify_password(password, &user.hashed_password) {
        return Ok(None);
    }
    Ok(Some(user))
}

/// Creates a fresh login token for `user_id`, clearing that user's expired ones.
pub async fn issue_token(
    pool: &SqlitePool,
    user_id: i64,
    expire_minutes: i64,
) -> Result<Session, sqlx::Error> {
    session_service::delete_expired_sessions_for_user(pool, user_id, Utc::now().naive_utc()).await?;
    session_service::create_session(pool, user_id, Duration::minutes(expire_minutes)).await
}

#[derive(Debug)]
pub enum AuthFailure {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    InactiveUser,
    Database(sqlx::Error),
}

impl AuthFailure {
    pub fn into_response(self) -> HttpResponse {
        match self {
            AuthFailure::MissingToken | AuthFailure::InvalidToken | AuthFailure::ExpiredToken => {
                unauthorized("Could not validate credentials")
            }
            AuthFailure::InactiveUser => {
                HttpResponse::BadRequest().json(ErrorResponse::new("Inactive user"))
            }
            AuthFailure::Database(e) => {
                error!("Failed to validate credentials: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse::new("Internal server error"))
            }
        }
    }
}

pub fn unauthorized(detail: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
        .json(ErrorResponse::new(detail))
}

/// Token from `Authorization: Bearer <token>`, or the session cookie.
pub fn request_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            let (scheme, token) = value.split_once(' ')?;
            if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
                Some(token.trim().to_string())
            } else {
                None
            }
        });

    bearer.or_else(|| req.cookie(SESSION_COOKIE).map(|cookie| cookie.value().to_string()))
}

/// Resolves the active user behind the request's token.
pub async fn current_user(pool: &SqlitePool, req: &HttpRequest) -> Result<User, AuthFailure> {
    let token = request_token(req).ok_or(AuthFailure::MissingToken)?;

    let session = session_service::find_session(pool, &token)
        .await
        .map_err(AuthFailure::Database)?
        .ok_or(AuthFailure::InvalidToken)?;

    if session.is_expired(Utc::now().naive_utc()) {
        info!("Session expired for user {}", session.user_id);
        session_service::delete_session(pool, &token)
            .await
            .map_err(AuthFailure::Database)?;
        return Err(AuthFailure::ExpiredToken);
    }

    let user = user_service::get_user_by_id(pool, session.user_id)
        .await
        .map_err(AuthFailure::Database)?
        .ok_or(AuthFailure::InvalidToken)?;

    if !user.is_active {
        return Err(AuthFailure::InactiveUser);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn password_round_trip() {
        let hashed = hash_password("s3cret", 4).unwrap();
        assert!(verify_password("s3cret", &hashed));
        assert!(!verify_password("wrong", &hashed));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc"))
            .cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE, "from-cookie"))
            .to_http_request();
        assert_eq!(request_token(&req).as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_is_used_without_header() {
        let req = TestRequest::default()
            .cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE, "from-cookie"))
            .to_http_request();
        assert_eq!(request_token(&req).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn non_bearer_scheme_is_ignored() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert!(request_token(&req).is_none());
    }
}
