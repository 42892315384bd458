use actix_web::{cookie::Cookie, web, HttpRequest, HttpResponse, Responder};
use log::{error, info};
use sqlx::SqlitePool;
use crate::auth::{self, AuthFailure, SESSION_COOKIE};
use crate::config::Settings;
use crate::models::user::UserRead;
use crate::routes::{ErrorResponse, MessageResponse};
use crate::services::{session_service, user_service};
use super::auth_models::{LoginRequest, LoginResponse, SignupRequest};

// register user to DB
pub async fn signup(
    pool: web::Data<SqlitePool>,
    settings: web::Data<Settings>,
    req: web::Json<SignupRequest>,
) -> impl Responder {
    let email = req.email.trim();
    info!("Received signup request for: {}", email);

    if email.is_empty() || req.password.is_empty() {
        return HttpResponse::UnprocessableEntity()
            .json(ErrorResponse::new("Email and password are required"));
    }

    match user_service::get_user_by_email(pool.get_ref(), email).await {
        Ok(Some(_)) => {
            info!("Email {} is already registered", email);
            return HttpResponse::BadRequest().json(ErrorResponse::new("Email already registered"));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Failed to execute query: {}", e);
            return HttpResponse::InternalServerError().finish();
        }
    }

    let hashed_password = match auth::hash_password(&req.password, settings.bcrypt_cost) {
        Ok(hp) => hp,
        Err(e) => {
            error!("Failed to hash password: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to hash password"));
        }
    };

    match user_service::create_user(pool.get_ref(), email, &hashed_password).await {
        Ok(user) => {
            info!("User {} registered successfully", email);
            HttpResponse::Ok().json(UserRead::from(user))
        }
        Err(e) if user_service::is_duplicate_email(&e) => {
            info!("Email {} was registered concurrently", email);
            HttpResponse::BadRequest().json(ErrorResponse::new("Email already registered"))
        }
        Err(e) => {
            error!("Failed to register user {}: {}", email, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to register user"))
        }
    }
}

// login logic
pub async fn login(
    pool: web::Data<SqlitePool>,
    settings: web::Data<Settings>,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    let email = req.email.trim();
    info!("Received login request for user: {}", email);

    let user = match auth::authenticate_user(pool.get_ref(), email, &req.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("Invalid credentials for user: {}", email);
            return auth::unauthorized("Incorrect email or password");
        }
        Err(e) => {
            error!("Failed to look up user {}: {}", email, e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    if !user.is_active {
        info!("Inactive user tried to log in: {}", email);
        return AuthFailure::InactiveUser.into_response();
    }

    let session = match auth::issue_token(
        pool.get_ref(),
        user.id,
        settings.access_token_expire_minutes,
    )
    .await
    {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to create session for user {}: {}", email, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to create session"));
        }
    };

    info!("User {} logged in successfully", email);
    HttpResponse::Ok()
        .cookie(
            Cookie::build(SESSION_COOKIE, session.session_id.clone())
                .path("/")
                .http_only(true)
                .finish(),
        )
        .json(LoginResponse {
            access_token: session.session_id,
            token_type: "bearer".into(),
            user: UserRead::from(user),
        })
}

pub async fn logout(pool: web::Data<SqlitePool>, req: HttpRequest) -> impl Responder {
    let token = match auth::request_token(&req) {
        Some(token) => token,
        None => {
            info!("Logout requested without a token");
            return AuthFailure::MissingToken.into_response();
        }
    };

    match session_service::delete_session(pool.get_ref(), &token).await {
        Ok(true) => {
            info!("Logout successful");
            let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
            removal.make_removal();
            HttpResponse::Ok().cookie(removal).json(MessageResponse {
                message: "Logout successful".into(),
            })
        }
        Ok(false) => {
            info!("Logout requested for unknown session");
            AuthFailure::InvalidToken.into_response()
        }
        Err(e) => {
            error!("Failed to delete session: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to logout"))
        }
    }
}
