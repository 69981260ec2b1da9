//! PostgreSQL rendering of a `QueryBuilder`
//!
//! Identifiers are validated and double-quoted; values are always bound as
//! `$n` parameters. Each row comes back as a single JSONB object so callers
//! never need a row struct per listing.

use crate::errors::StoreError;
use crate::query_builder::builder::QueryBuilder;
use crate::query_builder::filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
use crate::query_builder::join::JoinClause;
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::projection::SelectField;
use crate::validation::{ColumnRef, ValidatedFieldName, ValidatedTableName};
use serde_json::Value;

/// `jsonb_build_object` accepts at most 100 arguments
const MAX_PAIRS_PER_OBJECT: usize = 50;

/// `to_char` pattern for timestamp columns holding UTC, e.g. `2024-01-15T09:00:00.000Z`
const TIMESTAMP_FORMAT: &str = "YYYY-MM-DD\"T\"HH24:MI:SS.MS\"Z\"";

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build the complete SELECT statement
    pub fn build_select(query: &QueryBuilder) -> Result<(String, Vec<Value>), StoreError> {
        let table = ValidatedTableName::new(&query.table)?;
        let projection = Self::build_projection(&query.select, &table)?;

        let mut sql = format!("SELECT {} AS record FROM {}", projection, table.quoted());

        if let Some(join) = &query.join {
            sql.push(' ');
            sql.push_str(&Self::build_join_clause(join)?);
        }

        let (where_clause, values) = Self::build_where_clause(&query.conditions)?;
        for clause in [
            where_clause,
            Self::build_order_clause(&query.order_by)?,
            Self::build_limit_clause(query.limit),
        ] {
            if !clause.is_empty() {
                sql.push(' ');
                sql.push_str(&clause);
            }
        }

        crate::debug_log!(
            "Built SELECT on {} with {} bound values: {}",
            table,
            values.len(),
            sql
        );

        Ok((sql, values))
    }

    /// Build the JSONB projection expression
    pub fn build_projection(
        fields: &[SelectField],
        table: &ValidatedTableName,
    ) -> Result<String, StoreError> {
        let mut parts = Vec::new();

        if fields.is_empty() || fields.iter().any(|f| matches!(f, SelectField::All)) {
            parts.push(format!("to_jsonb({})", table.quoted()));
        }

        let mut pairs = Vec::new();
        for field in fields {
            if let (Some(key), Some(source)) = (field.output_key(), field.source()) {
                let key = ValidatedFieldName::new(key)?;
                let column = ColumnRef::parse(source)?.to_sql();
                let value = if field.is_timestamp() {
                    format!("to_char({}, '{}')", column, TIMESTAMP_FORMAT)
                } else {
                    column
                };
                pairs.push(format!("'{}', {}", key, value));
            }
        }

        for chunk in pairs.chunks(MAX_PAIRS_PER_OBJECT) {
            parts.push(format!("jsonb_build_object({})", chunk.join(", ")));
        }

        Ok(parts.join(" || "))
    }

    /// Build the JOIN clause
    pub fn build_join_clause(join: &JoinClause) -> Result<String, StoreError> {
        let table = ValidatedTableName::new(&join.table)?;
        let left = ColumnRef::parse(&join.left_field)?;
        let right = ColumnRef::parse(&join.right_field)?;

        Ok(format!(
            "{} {} ON {} = {}",
            join.join_type.to_sql(),
            table.quoted(),
            left.to_sql(),
            right.to_sql()
        ))
    }

    /// Build WHERE clause from conditions
    pub fn build_where_clause(conditions: &[QueryFilter]) -> Result<(String, Vec<Value>), StoreError> {
        if conditions.is_empty() {
            return Ok((String::new(), Vec::new()));
        }

        let mut values = Vec::new();
        let mut param_counter = 1;

        let conditions_sql = conditions
            .iter()
            .map(|condition| Self::build_condition_sql(condition, &mut values, &mut param_counter))
            .collect::<Result<Vec<_>, _>>()?
            .join(" AND ");

        Ok((format!("WHERE {}", conditions_sql), values))
    }

    fn build_condition_sql(
        filter: &QueryFilter,
        values: &mut Vec<Value>,
        param_counter: &mut usize,
    ) -> Result<String, StoreError> {
        match filter {
            QueryFilter::Condition(condition) => {
                Self::build_single_condition_sql(condition, values, param_counter)
            }
            QueryFilter::Group { operator, filters } => {
                let (operator_str, empty) = match operator {
                    LogicalOperator::And => (" AND ", "1=1"),
                    LogicalOperator::Or => (" OR ", "1=0"),
                };

                if filters.is_empty() {
                    return Ok(empty.to_string());
                }

                let group_conditions = filters
                    .iter()
                    .map(|f| Self::build_condition_sql(f, values, param_counter))
                    .collect::<Result<Vec<_>, _>>()?
                    .join(operator_str);

                Ok(format!("({})", group_conditions))
            }
        }
    }

    fn next_param(value: &Value, values: &mut Vec<Value>, param_counter: &mut usize) -> String {
        values.push(value.clone());
        let param = format!("${}", param_counter);
        *param_counter += 1;
        param
    }

    fn build_single_condition_sql(
        condition: &QueryCondition,
        values: &mut Vec<Value>,
        param_counter: &mut usize,
    ) -> Result<String, StoreError> {
        let column = ColumnRef::parse(&condition.field)?.to_sql();
        // String values compare against the column as text, which also covers enum columns
        let as_text = format!("{}::text", column);
        let field = column.as_str();

        let binary = |op: &str, values: &mut Vec<Value>, param_counter: &mut usize| match &condition.value {
            Some(value @ Value::String(_)) => {
                format!("{} {} {}", as_text, op, Self::next_param(value, values, param_counter))
            }
            Some(value) => format!("{} {} {}", field, op, Self::next_param(value, values, param_counter)),
            None => "1=0".to_string(),
        };
        // Range comparisons keep the column type
        let ordered = |op: &str, values: &mut Vec<Value>, param_counter: &mut usize| match &condition.value {
            Some(value) => format!("{} {} {}", field, op, Self::next_param(value, values, param_counter)),
            None => "1=0".to_string(),
        };

        let sql = match &condition.operator {
            QueryOperator::Eq if condition.value.is_none() => format!("{} IS NULL", field),
            QueryOperator::Ne if condition.value.is_none() => format!("{} IS NOT NULL", field),
            QueryOperator::Eq => binary("=", values, param_counter),
            QueryOperator::Ne => binary("!=", values, param_counter),
            QueryOperator::Gt => ordered(">", values, param_counter),
            QueryOperator::Gte => ordered(">=", values, param_counter),
            QueryOperator::Lt => ordered("<", values, param_counter),
            QueryOperator::Lte => ordered("<=", values, param_counter),
            QueryOperator::Like => binary("LIKE", values, param_counter),
            QueryOperator::ILike => binary("ILIKE", values, param_counter),
            QueryOperator::In | QueryOperator::NotIn => {
                let negated = condition.operator == QueryOperator::NotIn;
                match &condition.value {
                    Some(Value::Array(array_values)) if !array_values.is_empty() => {
                        let placeholders: Vec<String> = array_values
                            .iter()
                            .map(|v| Self::next_param(v, values, param_counter))
                            .collect();
                        let keyword = if negated { "NOT IN" } else { "IN" };
                        let target = if array_values.iter().any(Value::is_string) {
                            as_text.as_str()
                        } else {
                            field
                        };
                        format!("{} {} ({})", target, keyword, placeholders.join(", "))
                    }
                    // Empty IN matches nothing, empty NOT IN matches everything
                    _ if negated => "1=1".to_string(),
                    _ => "1=0".to_string(),
                }
            }
            QueryOperator::IsNull => format!("{} IS NULL", field),
            QueryOperator::IsNotNull => format!("{} IS NOT NULL", field),
        };

        Ok(sql)
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(order_by: &[(String, SortOrder)]) -> Result<String, StoreError> {
        if order_by.is_empty() {
            return Ok(String::new());
        }

        let order_items = order_by
            .iter()
            .map(|(field, order)| {
                ColumnRef::parse(field).map(|column| format!("{} {}", column.to_sql(), order.to_sql()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(format!("ORDER BY {}", order_items.join(", ")))
    }

    pub fn build_limit_clause(limit: Option<i64>) -> String {
        match limit {
            Some(limit) => format!("LIMIT {}", limit),
            None => String::new(),
        }
    }
}
