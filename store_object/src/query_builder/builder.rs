//! Query builder
//!
//! A `QueryBuilder` describes one read: a primary table, an optional join
//! against one related table, a projection, AND-combined predicates, ordering
//! and an optional limit. Store backends consume it; nothing here touches a
//! connection.

use crate::errors::StoreError;
use crate::query_builder::filter::QueryFilter;
use crate::query_builder::join::JoinClause;
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::projection::SelectField;
use crate::query_builder::sql_generation::SqlGenerator;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    pub(crate) table: String,
    pub(crate) select: Vec<SelectField>,
    pub(crate) join: Option<JoinClause>,
    pub(crate) conditions: Vec<QueryFilter>,
    pub(crate) order_by: Vec<(String, SortOrder)>,
    pub(crate) limit: Option<i64>,
}

impl QueryBuilder {
    /// Start a query against `table`
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            select: Vec::new(),
            join: None,
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Add a projected field
    pub fn select(mut self, field: SelectField) -> Self {
        self.select.push(field);
        self
    }

    /// Add several projected fields
    pub fn select_fields(mut self, fields: Vec<SelectField>) -> Self {
        self.select.extend(fields);
        self
    }

    /// Set the join target. A query joins at most one table, so this replaces
    /// any join set earlier.
    pub fn join(mut self, join: JoinClause) -> Self {
        self.join = Some(join);
        self
    }

    pub fn left_join(self, table: &str, left_field: &str, right_field: &str) -> Self {
        self.join(JoinClause::left(table, left_field, right_field))
    }

    /// Add a filter condition
    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.conditions.push(filter);
        self
    }

    /// Add multiple filters (combined with AND)
    pub fn filters(mut self, filters: Vec<QueryFilter>) -> Self {
        self.conditions.extend(filters);
        self
    }

    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.order_by.push((field.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn projection(&self) -> &[SelectField] {
        &self.select
    }

    pub fn join_clause(&self) -> Option<&JoinClause> {
        self.join.as_ref()
    }

    pub fn conditions(&self) -> &[QueryFilter] {
        &self.conditions
    }

    pub fn ordering(&self) -> &[(String, SortOrder)] {
        &self.order_by
    }

    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    /// Build WHERE clause
    pub fn build_where_clause(&self) -> Result<(String, Vec<Value>), StoreError> {
        SqlGenerator::build_where_clause(&self.conditions)
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(&self) -> Result<String, StoreError> {
        SqlGenerator::build_order_clause(&self.order_by)
    }

    pub fn build_limit_clause(&self) -> String {
        SqlGenerator::build_limit_clause(self.limit)
    }

    /// Render the full parameterized SELECT and its bind values
    pub fn build_sql(&self) -> Result<(String, Vec<Value>), StoreError> {
        SqlGenerator::build_select(self)
    }
}
