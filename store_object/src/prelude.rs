//! Convenience re-exports for common store-object usage

// Core traits
pub use crate::traits::{RecordStore, TableMetadata};

// Error types
pub use crate::errors::StoreError;

// Store backends
pub use crate::generic_store::{MemoryStore, PgRecordStore};

// Validation
pub use crate::validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

// Query building
pub use crate::query_builder::{JoinClause, QueryBuilder, QueryFilter, SelectField, SortOrder};

// Resource listings
pub use crate::listing::{FilterParams, FilterRule, FilterValue, ResourceListing};

pub use crate::Record;

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use sqlx::PgPool;
