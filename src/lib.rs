//! # Academy
//!
//! Course catalog and learner API for an online academy. Every endpoint is a
//! filter-driven listing (`store_object::ResourceListing`) executed once
//! against a single store handle: PostgreSQL in production, or the in-memory
//! store for demos and tests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use academy::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::memory(None);
//!     let academy = Academy::connect(&config.database).await?;
//!
//!     let params = FilterParams::new().with("category", "Performance");
//!     let courses = catalog::courses()
//!         .list(academy.store().as_ref(), &params)
//!         .await?;
//!     println!("{} courses", courses.len());
//!
//!     let app = build_router(AppState::new(academy.store()), &config.server.cors_origins);
//!     let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod errors;
pub mod prelude;
pub mod schema;
pub mod seed;

// Re-export the main public types for convenience
pub use api::{ApiError, AppState, build_router};
pub use core::Academy;
pub use errors::AcademyError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, ServerConfig, StoreBackend};

// Re-export internal crates used by the public API
pub use store_object;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
