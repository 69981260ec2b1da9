//! In-memory record store
//!
//! Executes the same `QueryBuilder` the PostgreSQL store renders to SQL, with
//! matching join, filter, ordering and projection semantics. Used by tests
//! and by the demo mode of the server.

use super::eval::{
    compare_rows, eval_filter, format_timestamp, qualify_field, qualify_filter, qualify_row,
    values_equal,
};
use crate::errors::StoreError;
use crate::query_builder::{JoinType, QueryBuilder, QueryFilter, SelectField, SortOrder};
use crate::traits::{RecordStore, TableMetadata};
use crate::validation::{ValidatedFieldName, ValidatedTableName};
use crate::Record;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Record>>>,
}

/// A `QueryBuilder` with every column reference resolved to `table.column`
struct ResolvedQuery<'a> {
    table: &'a str,
    join: Option<ResolvedJoin<'a>>,
    conditions: Vec<QueryFilter>,
    order_by: Vec<(String, SortOrder)>,
    projection: Vec<ProjectedColumn>,
    select_all: bool,
    limit: Option<i64>,
}

struct ProjectedColumn {
    key: String,
    /// Qualified `table.column` key in the joined row
    source: String,
    timestamp: bool,
}

struct ResolvedJoin<'a> {
    join_type: JoinType,
    table: &'a str,
    left_key: String,
    right_key: String,
}

impl<'a> ResolvedQuery<'a> {
    fn resolve(query: &'a QueryBuilder) -> Result<Self, StoreError> {
        ValidatedTableName::new(query.table())?;
        let default_table = query.table();

        let join = query
            .join_clause()
            .map(|join| -> Result<ResolvedJoin<'a>, StoreError> {
                ValidatedTableName::new(&join.table)?;
                Ok(ResolvedJoin {
                    join_type: join.join_type,
                    table: join.table.as_str(),
                    left_key: qualify_field(&join.left_field, default_table)?,
                    right_key: qualify_field(&join.right_field, default_table)?,
                })
            })
            .transpose()?;

        let conditions = query
            .conditions()
            .iter()
            .map(|f| qualify_filter(f, default_table))
            .collect::<Result<Vec<_>, _>>()?;

        let order_by = query
            .ordering()
            .iter()
            .map(|(field, order)| Ok((qualify_field(field, default_table)?, *order)))
            .collect::<Result<Vec<_>, StoreError>>()?;

        let mut projection = Vec::new();
        for field in query.projection() {
            if let (Some(key), Some(source)) = (field.output_key(), field.source()) {
                ValidatedFieldName::new(key)?;
                projection.push(ProjectedColumn {
                    key: key.to_string(),
                    source: qualify_field(source, default_table)?,
                    timestamp: field.is_timestamp(),
                });
            }
        }

        let select_all = query.projection().is_empty()
            || query.projection().iter().any(|f| matches!(f, SelectField::All));

        Ok(Self {
            table: default_table,
            join,
            conditions,
            order_by,
            projection,
            select_all,
            limit: query.limit_value(),
        })
    }

    fn project(&self, row: &Record) -> Record {
        let mut out = Map::new();

        if self.select_all {
            let prefix = format!("{}.", self.table);
            for (key, value) in row {
                if let Some(column) = key.strip_prefix(&prefix) {
                    out.insert(column.to_string(), value.clone());
                }
            }
        }

        for column in &self.projection {
            let value = match row.get(&column.source) {
                Some(value) if column.timestamp => format_timestamp(value),
                Some(value) => value.clone(),
                None => Value::Null,
            };
            out.insert(column.key.clone(), value);
        }

        out
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `table` exists, even if it stays empty
    pub async fn create_table(&self, table: &str) -> Result<(), StoreError> {
        let table = ValidatedTableName::new(table)?;
        self.tables
            .write()
            .await
            .entry(table.as_str().to_string())
            .or_default();
        Ok(())
    }

    pub async fn insert_record(&self, table: &str, record: Record) -> Result<(), StoreError> {
        let table = ValidatedTableName::new(table)?;
        for column in record.keys() {
            ValidatedFieldName::new(column)?;
        }

        self.tables
            .write()
            .await
            .entry(table.as_str().to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    pub async fn insert<T: TableMetadata>(&self, entity: &T) -> Result<(), StoreError> {
        self.insert_record(T::table_name(), entity.to_record()?).await
    }

    pub async fn insert_many<T: TableMetadata>(&self, entities: &[T]) -> Result<(), StoreError> {
        self.create_table(T::table_name()).await?;
        for entity in entities {
            self.insert(entity).await?;
        }
        Ok(())
    }

    /// Load a JSON fixture of the form `{ "table": [ { "column": value } ] }`
    ///
    /// Returns the number of rows loaded.
    pub async fn load_fixture(&self, path: impl AsRef<Path>) -> Result<usize, StoreError> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let fixture: Map<String, Value> = serde_json::from_str(&content)?;

        let mut loaded = 0;
        for (table, rows) in fixture {
            self.create_table(&table).await?;
            let Value::Array(rows) = rows else {
                return Err(StoreError::InvalidRecord {
                    table,
                    reason: "fixture tables must be arrays of objects".to_string(),
                });
            };

            for row in rows {
                let Value::Object(record) = row else {
                    return Err(StoreError::InvalidRecord {
                        table,
                        reason: "fixture rows must be objects".to_string(),
                    });
                };
                self.insert_record(&table, record).await?;
                loaded += 1;
            }
        }

        tracing::info!("Loaded {} fixture rows from {}", loaded, path.as_ref().display());
        Ok(loaded)
    }

    pub async fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_all(&self, query: &QueryBuilder) -> Result<Vec<Record>, StoreError> {
        let plan = ResolvedQuery::resolve(query)?;
        let tables = self.tables.read().await;

        let primary = tables
            .get(plan.table)
            .ok_or_else(|| StoreError::UnknownTable(plan.table.to_string()))?;

        let related = match &plan.join {
            Some(join) => Some((
                join,
                tables
                    .get(join.table)
                    .ok_or_else(|| StoreError::UnknownTable(join.table.to_string()))?,
            )),
            None => None,
        };

        let mut rows = Vec::with_capacity(primary.len());
        for source in primary {
            let mut base = Map::new();
            qualify_row(plan.table, source, &mut base);

            let Some((join, related_rows)) = related else {
                rows.push(base);
                continue;
            };

            let mut matched = false;
            for related_row in related_rows {
                let mut candidate = base.clone();
                qualify_row(join.table, related_row, &mut candidate);

                let is_match = match (candidate.get(&join.left_key), candidate.get(&join.right_key)) {
                    (Some(left), Some(right)) => values_equal(left, right),
                    _ => false,
                };
                if is_match {
                    matched = true;
                    rows.push(candidate);
                }
            }

            if !matched && join.join_type == JoinType::Left {
                rows.push(base);
            }
        }

        rows.retain(|row| plan.conditions.iter().all(|filter| eval_filter(row, filter)));
        // Vec::sort_by is stable, so equal keys keep insertion order
        rows.sort_by(|a, b| compare_rows(a, b, &plan.order_by));

        if let Some(limit) = plan.limit {
            rows.truncate(usize::try_from(limit).unwrap_or(0));
        }

        crate::trace_log!(
            "Memory store returned {} rows from {}",
            rows.len(),
            plan.table
        );

        Ok(rows.iter().map(|row| plan.project(row)).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test rows must be objects"),
        }
    }

    async fn store_with_courses() -> MemoryStore {
        let store = MemoryStore::new();
        for user in [
            json!({"id": "u1", "name": "John Instructor"}),
            json!({"id": "u2", "name": "Jane Expert"}),
        ] {
            store.insert_record("users", record(user)).await.unwrap();
        }
        for course in [
            json!({"id": "c1", "title": "Observability", "category": "Observability", "instructor_id": "u1", "created_at": "2024-01-01T00:00:00Z"}),
            json!({"id": "c2", "title": "Errors", "category": "Error Handling", "instructor_id": "u2", "created_at": "2024-03-01T00:00:00Z"}),
            json!({"id": "c3", "title": "Perf", "category": "Performance", "instructor_id": "ghost", "created_at": "2024-02-01T00:00:00Z"}),
        ] {
            store.insert_record("courses", record(course)).await.unwrap();
        }
        store
    }

    fn course_listing() -> QueryBuilder {
        QueryBuilder::new("courses")
            .select(SelectField::field("courses.id"))
            .select(SelectField::field_as("users.name", "instructor"))
            .left_join("users", "courses.instructor_id", "users.id")
            .order_by("courses.created_at", SortOrder::Desc)
    }

    fn ids(rows: &[Record]) -> Vec<&str> {
        rows.iter().map(|r| r["id"].as_str().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_left_join_keeps_unmatched_rows() {
        let store = store_with_courses().await;
        let rows = store.fetch_all(&course_listing()).await.unwrap();

        assert_eq!(ids(&rows), vec!["c2", "c3", "c1"]);
        assert_eq!(rows[0]["instructor"], json!("Jane Expert"));
        assert_eq!(rows[1]["instructor"], Value::Null);
    }

    #[tokio::test]
    async fn test_sub_second_timestamps_order_newest_first() {
        let store = MemoryStore::new();
        store.create_table("users").await.unwrap();
        for course in [
            json!({"id": "older", "created_at": "2024-01-01T00:00:00Z"}),
            json!({"id": "newer", "created_at": "2024-01-01T00:00:00.500Z"}),
        ] {
            store.insert_record("courses", record(course)).await.unwrap();
        }

        let query = course_listing().select(SelectField::timestamp_as("courses.created_at", "createdAt"));
        let rows = store.fetch_all(&query).await.unwrap();

        assert_eq!(ids(&rows), vec!["newer", "older"]);
        assert_eq!(rows[0]["createdAt"], json!("2024-01-01T00:00:00.500Z"));
        assert_eq!(rows[1]["createdAt"], json!("2024-01-01T00:00:00.000Z"));
    }

    #[tokio::test]
    async fn test_inner_join_drops_unmatched_rows() {
        let store = store_with_courses().await;
        let query = QueryBuilder::new("courses")
            .select(SelectField::field("courses.id"))
            .join(crate::query_builder::JoinClause::inner(
                "users",
                "courses.instructor_id",
                "users.id",
            ))
            .order_by("courses.id", SortOrder::Asc);

        let rows = store.fetch_all(&query).await.unwrap();
        assert_eq!(ids(&rows), vec!["c1", "c2"]);
    }

    #[tokio::test]
    async fn test_filter_on_joined_column() {
        let store = store_with_courses().await;
        let query = course_listing().filter(QueryFilter::eq("users.name", json!("John Instructor")));

        let rows = store.fetch_all(&query).await.unwrap();
        assert_eq!(ids(&rows), vec!["c1"]);
    }

    #[tokio::test]
    async fn test_select_all_returns_unqualified_columns() {
        let store = store_with_courses().await;
        let query = QueryBuilder::new("courses").filter(QueryFilter::eq("id", json!("c3")));

        let rows = store.fetch_all(&query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["category"], json!("Performance"));
        assert!(rows[0].get("courses.category").is_none());
    }

    #[tokio::test]
    async fn test_fetch_one_not_found() {
        let store = store_with_courses().await;
        let query = QueryBuilder::new("courses").filter(QueryFilter::eq("id", json!("missing")));

        let err = store.fetch_one(&query).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let store = MemoryStore::new();
        let err = store.fetch_all(&QueryBuilder::new("courses")).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownTable(t) if t == "courses"));
    }

    #[tokio::test]
    async fn test_limit_truncates_after_ordering() {
        let store = store_with_courses().await;
        let rows = store.fetch_all(&course_listing().limit(2)).await.unwrap();
        assert_eq!(ids(&rows), vec!["c2", "c3"]);
    }

    #[tokio::test]
    async fn test_load_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.json");
        std::fs::write(
            &path,
            r#"{"categories": [{"id": "k1", "name": "Performance", "order": 3}], "reviews": []}"#,
        )
        .unwrap();

        let store = MemoryStore::new();
        assert_eq!(store.load_fixture(&path).await.unwrap(), 1);
        assert_eq!(store.row_count("categories").await, 1);

        // Empty tables exist and list as empty
        let rows = store.fetch_all(&QueryBuilder::new("reviews")).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_bad_column_names() {
        let store = MemoryStore::new();
        let err = store
            .insert_record("courses", record(json!({"bad column": 1})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
