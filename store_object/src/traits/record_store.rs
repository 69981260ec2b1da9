use crate::errors::StoreError;
use crate::query_builder::QueryBuilder;
use crate::Record;
use async_trait::async_trait;
use std::fmt::Debug;

/// A relational store that can execute a `QueryBuilder`
///
/// Implementations are shared across requests behind an `Arc`, so they must
/// not keep per-query state.
#[async_trait]
pub trait RecordStore: Send + Sync + Debug {
    /// Execute the query once and return every row, in query order
    async fn fetch_all(&self, query: &QueryBuilder) -> Result<Vec<Record>, StoreError>;

    /// Execute the query with `LIMIT 1`; zero rows is `StoreError::NotFound`
    async fn fetch_one(&self, query: &QueryBuilder) -> Result<Record, StoreError> {
        let limited = query.clone().limit(1);
        self.fetch_all(&limited)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(query.table().to_string()))
    }

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
