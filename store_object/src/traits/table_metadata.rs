//! Trait definitions
//!
//! This module defines the metadata every typed entity carries.

use crate::errors::StoreError;
use crate::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

/// Metadata about a database table and the entity stored in it
///
/// Serialized field names are the column names, so entities keep snake_case
/// fields and no `rename_all`.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use store_object::TableMetadata;
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Category {
///     pub id: String,
///     pub name: String,
/// }
///
/// impl TableMetadata for Category {
///     fn table_name() -> &'static str {
///         "categories"
///     }
/// }
///
/// let record = Category { id: "c1".into(), name: "Performance".into() }.to_record().unwrap();
/// assert_eq!(record["name"], "Performance");
/// ```
pub trait TableMetadata: Clone + Send + Sync + Debug + Serialize + for<'de> Deserialize<'de> {
    /// The table name in the database
    fn table_name() -> &'static str;

    /// Get the primary key field name
    fn primary_key_field() -> &'static str {
        "id"
    }

    /// Convert the entity into a flat column → value record
    fn to_record(&self) -> Result<Record, StoreError> {
        match serde_json::to_value(self)? {
            Value::Object(record) => Ok(record),
            other => Err(StoreError::InvalidRecord {
                table: Self::table_name().to_string(),
                reason: format!("expected a JSON object, got {}", other),
            }),
        }
    }
}
