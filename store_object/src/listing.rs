//! Filter-driven resource listings
//!
//! A `ResourceListing` declares a table, its projection, an optional LEFT join
//! and the filter keys it recognizes. Each call turns the caller's key/value
//! filters into predicates and runs exactly one query.

use crate::errors::StoreError;
use crate::query_builder::{JoinClause, QueryBuilder, QueryFilter, SelectField, SortOrder};
use crate::traits::RecordStore;
use crate::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// A single filter value as it arrives from a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Text(String),
}

impl FilterValue {
    fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    fn is_true(&self) -> bool {
        match self {
            FilterValue::Bool(b) => *b,
            FilterValue::Text(text) => text == "true",
        }
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        FilterValue::Text(text.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(text: String) -> Self {
        FilterValue::Text(text)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

/// Optional filters keyed by their public name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterParams(BTreeMap<String, FilterValue>);

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<FilterValue>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for FilterParams {
    fn from(query: HashMap<String, String>) -> Self {
        Self(
            query
                .into_iter()
                .map(|(key, value)| (key, FilterValue::Text(value)))
                .collect(),
        )
    }
}

/// How a recognized filter key becomes a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum FilterRule {
    /// Non-empty text or a boolean becomes `column = value`
    Equals { key: String, column: String },
    /// Text parsed as an integer becomes `column = n`; unparsable text matches nothing
    Integer { key: String, column: String },
    /// Only `true` (or `"true"`) applies `column = TRUE`
    Flag { key: String, column: String },
    /// Case-insensitive substring match against any of `columns`
    Contains { key: String, columns: Vec<String> },
}

impl FilterRule {
    pub fn equals(key: &str, column: &str) -> Self {
        Self::Equals {
            key: key.to_string(),
            column: column.to_string(),
        }
    }

    pub fn integer(key: &str, column: &str) -> Self {
        Self::Integer {
            key: key.to_string(),
            column: column.to_string(),
        }
    }

    pub fn flag(key: &str, column: &str) -> Self {
        Self::Flag {
            key: key.to_string(),
            column: column.to_string(),
        }
    }

    pub fn contains(key: &str, columns: &[&str]) -> Self {
        Self::Contains {
            key: key.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            FilterRule::Equals { key, .. }
            | FilterRule::Integer { key, .. }
            | FilterRule::Flag { key, .. }
            | FilterRule::Contains { key, .. } => key,
        }
    }

    /// Translate `value` into a predicate, or `None` when the value does not apply
    pub fn predicate(&self, value: &FilterValue) -> Option<QueryFilter> {
        match self {
            FilterRule::Equals { column, .. } => match value {
                FilterValue::Bool(b) => Some(QueryFilter::eq(column, Value::Bool(*b))),
                FilterValue::Text(_) => value
                    .as_text()
                    .map(|text| QueryFilter::eq(column, Value::String(text.to_string()))),
            },
            FilterRule::Integer { column, .. } => {
                let text = value.as_text()?;
                match text.trim().parse::<i64>() {
                    Ok(n) => Some(QueryFilter::eq(column, Value::from(n))),
                    Err(_) => Some(QueryFilter::or(vec![])),
                }
            }
            FilterRule::Flag { column, .. } => value
                .is_true()
                .then(|| QueryFilter::eq(column, Value::Bool(true))),
            FilterRule::Contains { columns, .. } => {
                let text = value.as_text()?;
                let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
                Some(QueryFilter::contains(&columns, text))
            }
        }
    }
}

/// A declared listing over one table
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceListing {
    table: String,
    select: Vec<SelectField>,
    join: Option<JoinClause>,
    rules: Vec<FilterRule>,
    order_by: Vec<(String, SortOrder)>,
}

impl ResourceListing {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            select: Vec::new(),
            join: None,
            rules: Vec::new(),
            order_by: Vec::new(),
        }
    }

    pub fn select(mut self, field: SelectField) -> Self {
        self.select.push(field);
        self
    }

    pub fn select_fields(mut self, fields: Vec<SelectField>) -> Self {
        self.select.extend(fields);
        self
    }

    /// Enrich rows from `table` with a LEFT join on `left_field = right_field`
    pub fn join(mut self, table: &str, left_field: &str, right_field: &str) -> Self {
        self.join = Some(JoinClause::left(table, left_field, right_field));
        self
    }

    pub fn rule(mut self, rule: FilterRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.order_by.push((field.to_string(), order));
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    /// Predicates for every recognized key present in `params`, in rule order
    pub fn predicates(&self, params: &FilterParams) -> Vec<QueryFilter> {
        self.rules
            .iter()
            .filter_map(|rule| params.get(rule.key()).and_then(|v| rule.predicate(v)))
            .collect()
    }

    /// Build the query for `params`; unrecognized keys are ignored
    pub fn query(&self, params: &FilterParams) -> QueryBuilder {
        let mut query = QueryBuilder::new(&self.table)
            .select_fields(self.select.clone())
            .filters(self.predicates(params));

        if let Some(join) = &self.join {
            query = query.join(join.clone());
        }
        for (field, order) in &self.order_by {
            query = query.order_by(field, *order);
        }

        // Ties on the declared ordering fall back to the primary key
        if !self.order_by.is_empty() {
            let key = format!("{}.id", self.table);
            if !self.order_by.iter().any(|(field, _)| *field == key) {
                query = query.order_by(&key, SortOrder::Asc);
            }
        }

        query
    }

    /// Run the listing once and return every matching row
    pub async fn list(
        &self,
        store: &dyn RecordStore,
        params: &FilterParams,
    ) -> Result<Vec<Record>, StoreError> {
        self.list_scoped(store, params, Vec::new()).await
    }

    /// Run the listing with extra fixed predicates appended after the filters
    pub async fn list_scoped(
        &self,
        store: &dyn RecordStore,
        params: &FilterParams,
        scope: Vec<QueryFilter>,
    ) -> Result<Vec<Record>, StoreError> {
        let query = self.query(params).filters(scope);
        crate::debug_log!(
            "Listing {} with {} predicates",
            self.table,
            query.conditions().len()
        );
        store.fetch_all(&query).await
    }

    /// Fetch the single row whose `column` equals `id`
    pub async fn find(
        &self,
        store: &dyn RecordStore,
        column: &str,
        id: &str,
    ) -> Result<Record, StoreError> {
        let query = self
            .query(&FilterParams::default())
            .filter(QueryFilter::eq(column, Value::String(id.to_string())));
        store.fetch_one(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generic_store::MemoryStore;
    use serde_json::json;

    fn courses() -> ResourceListing {
        ResourceListing::new("courses")
            .select(SelectField::All)
            .select(SelectField::field_as("users.name", "instructorName"))
            .join("users", "courses.instructor_id", "users.id")
            .rule(FilterRule::equals("category", "courses.category"))
            .rule(FilterRule::equals("level", "courses.level"))
            .rule(FilterRule::flag("featured", "courses.is_featured"))
            .order_by("courses.created_at", SortOrder::Desc)
    }

    #[test]
    fn test_unrecognized_and_empty_keys_ignored() {
        let params = FilterParams::new()
            .with("category", "")
            .with("sort", "title")
            .with("featured", "yes");

        assert!(courses().predicates(&params).is_empty());
        assert!(courses().query(&params).conditions().is_empty());
    }

    #[test]
    fn test_flag_accepts_text_and_bool() {
        let listing = courses();

        for value in [FilterValue::from("true"), FilterValue::from(true)] {
            let params = FilterParams::new().with("featured", value);
            assert_eq!(
                listing.predicates(&params),
                vec![QueryFilter::eq("courses.is_featured", json!(true))]
            );
        }

        let params = FilterParams::new().with("featured", false);
        assert!(listing.predicates(&params).is_empty());
    }

    #[test]
    fn test_predicates_follow_rule_order() {
        let params = FilterParams::new()
            .with("level", "beginner")
            .with("category", "Performance");

        assert_eq!(
            courses().predicates(&params),
            vec![
                QueryFilter::eq("courses.category", json!("Performance")),
                QueryFilter::eq("courses.level", json!("beginner")),
            ]
        );
    }

    #[test]
    fn test_integer_rule() {
        let rule = FilterRule::integer("rating", "reviews.rating");

        assert_eq!(
            rule.predicate(&FilterValue::from("5")),
            Some(QueryFilter::eq("reviews.rating", json!(5)))
        );
        assert_eq!(
            rule.predicate(&FilterValue::from("five")),
            Some(QueryFilter::or(vec![]))
        );
        assert_eq!(rule.predicate(&FilterValue::from("")), None);
    }

    #[test]
    fn test_params_from_query_map() {
        let mut query = HashMap::new();
        query.insert("category".to_string(), "Performance".to_string());

        let params = FilterParams::from(query);
        assert_eq!(params.get("category"), Some(&FilterValue::from("Performance")));
    }

    #[test]
    fn test_params_deserialize_mixed_values() {
        let params: FilterParams =
            serde_json::from_value(json!({"featured": true, "level": "beginner"})).unwrap();

        assert_eq!(params.get("featured"), Some(&FilterValue::Bool(true)));
        assert_eq!(params.get("level"), Some(&FilterValue::from("beginner")));
    }

    #[tokio::test]
    async fn test_list_and_find() {
        let store = MemoryStore::new();
        store
            .insert_record("users", json!({"id": "u1", "name": "John"}).as_object().unwrap().clone())
            .await
            .unwrap();
        for (id, category, created) in [
            ("c1", "Performance", "2024-01-01"),
            ("c2", "Observability", "2024-02-01"),
        ] {
            let row = json!({
                "id": id,
                "category": category,
                "instructor_id": "u1",
                "created_at": created,
            });
            store
                .insert_record("courses", row.as_object().unwrap().clone())
                .await
                .unwrap();
        }

        let all = courses().list(&store, &FilterParams::new()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0]["id"], json!("c2"));
        assert_eq!(all[0]["instructorName"], json!("John"));

        let params = FilterParams::new().with("category", "Performance");
        let filtered = courses().list(&store, &params).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0]["id"], json!("c1"));

        let scoped = courses()
            .list_scoped(
                &store,
                &FilterParams::new(),
                vec![QueryFilter::eq("courses.id", json!("c1"))],
            )
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);

        let found = courses().find(&store, "courses.id", "c2").await.unwrap();
        assert_eq!(found["category"], json!("Observability"));

        let missing = courses().find(&store, "courses.id", "nope").await.unwrap_err();
        assert!(missing.is_not_found());
    }
}
