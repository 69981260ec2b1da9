//! Convenience re-exports for common academy usage
//!
//! # Example
//!
//! ```rust
//! use academy::prelude::*;
//!
//! let listing = catalog::courses();
//! assert_eq!(listing.table(), "courses");
//! ```

// Core academy components
pub use crate::api::{ApiError, AppState, build_router};
pub use crate::catalog;
pub use crate::core::Academy;
pub use crate::errors::AcademyError;
pub use crate::schema::{
    Category, Certificate, Course, Enrollment, Lesson, LessonProgress, Review, User,
};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, ServerConfig, StoreBackend};

// Re-export commonly used store-object types for convenience
pub use store_object::prelude::*;

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;
