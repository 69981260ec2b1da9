//! Error types for the academy crate
//!
//! This module contains the errors startup and wiring code can return.
//! HTTP-facing errors live in `api::ApiError`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcademyError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Store(#[from] store_object::StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
