// src/services/mod.rs

pub mod session_service;
pub mod task_service;
pub mod user_service;
