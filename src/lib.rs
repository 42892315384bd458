//! Task management: an HTTP task API backed by sqlite, and an interactive
//! todo list manager for the terminal.

pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;
pub mod todo;
