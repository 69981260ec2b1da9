use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error during {operation} on {table}: {source}")]
    Database {
        table: String,
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Invalid identifier: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid record for {table}: {reason}")]
    InvalidRecord { table: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Wrap a sqlx failure with the table and operation it happened in
    pub fn database(table: impl Into<String>, operation: &'static str, source: sqlx::Error) -> Self {
        Self::Database {
            table: table.into(),
            operation,
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
