use actix_web::{HttpResponse, Responder};
use serde::{Deserialize, Serialize};

pub mod routes;

pub mod auth {
    pub mod auth_handlers;
    pub mod auth_models;
}

pub mod tasks {
    pub mod task_handlers;
    pub mod task_models;
}

// Body of every error response: {"detail": "..."}
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        ErrorResponse { detail: detail.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn read_root() -> impl Responder {
    HttpResponse::Ok().json(MessageResponse {
        message: "Welcome to the Todo Task Management API".into(),
    })
}
