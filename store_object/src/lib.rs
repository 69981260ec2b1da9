//! Store Object - query building and record stores for the academy API
//!
//! This crate provides the query model (`QueryBuilder`), its PostgreSQL
//! rendering, the `RecordStore` trait with PostgreSQL and in-memory backends,
//! and the filter-driven `ResourceListing` built on top of them.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod errors;
pub mod generic_store;
pub mod listing;
pub mod prelude;
pub mod query_builder;
pub mod traits;
pub mod validation;

pub use errors::StoreError;
pub use generic_store::{MemoryStore, PgRecordStore};
pub use listing::{FilterParams, FilterRule, FilterValue, ResourceListing};
pub use query_builder::{
    JoinClause, JoinType, QueryBuilder, QueryFilter, QueryOperator, SelectField, SortOrder,
};
pub use traits::*;
pub use validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

use sqlx::PgPool;

pub type DbPool = PgPool;

/// One result row: output key → JSON value
pub type Record = serde_json::Map<String, serde_json::Value>;
