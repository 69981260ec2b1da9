use crate::errors::StoreError;
use crate::query_builder::QueryBuilder;
use crate::traits::RecordStore;
use crate::Record;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

/// PostgreSQL-backed record store
///
/// Each query runs as a single parameterized statement that projects every
/// row into one JSONB `record` column.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    db_pool: PgPool,
}

// Bind a JSON value with the closest native Postgres type
macro_rules! bind_json_param {
    ($query:expr, $param:expr) => {
        match $param {
            Value::String(s) => $query.bind(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    $query.bind(i)
                } else {
                    $query.bind(n.as_f64())
                }
            }
            Value::Bool(b) => $query.bind(b),
            Value::Null => $query.bind(Option::<String>::None),
            other => $query.bind(Json(other)),
        }
    };
}

impl PgRecordStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db_pool
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn fetch_all(&self, query: &QueryBuilder) -> Result<Vec<Record>, StoreError> {
        let (sql, params) = query.build_sql()?;
        let table = query.table();

        let mut sqlx_query = sqlx::query_scalar::<_, Json<Value>>(&sql);
        for param in params {
            sqlx_query = bind_json_param!(sqlx_query, param);
        }

        let rows = sqlx_query
            .fetch_all(&self.db_pool)
            .await
            .map_err(|e| StoreError::database(table, "fetch_all", e))?;

        crate::trace_log!("Fetched {} rows from {}", rows.len(), table);

        rows.into_iter()
            .map(|Json(value)| match value {
                Value::Object(record) => Ok(record),
                other => Err(StoreError::InvalidRecord {
                    table: table.to_string(),
                    reason: format!("row projected to non-object JSON: {}", other),
                }),
            })
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.db_pool)
            .await
            .map_err(|e| StoreError::database("pg_catalog", "ping", e))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
