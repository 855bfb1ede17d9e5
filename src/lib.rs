// Social feed service - users, posts, likes with a write-through like-count cache

pub mod app_state;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod reconciler;
pub mod routes;
pub mod services;

// Re-exports for convenience
pub use error::{AppError, AppResult};
