//! In-memory evaluation of predicates and ordering
//!
//! Rows are flat maps keyed by `table.column`. Semantics follow PostgreSQL:
//! comparisons against NULL are never true, empty IN matches nothing, and
//! NULL sorts after every other value. Strings that parse as timestamps
//! compare as instants, matching how PostgreSQL compares timestamp columns.

use crate::errors::StoreError;
use crate::query_builder::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator, SortOrder};
use crate::validation::ColumnRef;
use crate::Record;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;

/// Rewrite every field in `filter` to its qualified `table.column` key
pub fn qualify_filter(filter: &QueryFilter, default_table: &str) -> Result<QueryFilter, StoreError> {
    match filter {
        QueryFilter::Condition(condition) => Ok(QueryFilter::Condition(QueryCondition {
            field: qualify_field(&condition.field, default_table)?,
            operator: condition.operator.clone(),
            value: condition.value.clone(),
        })),
        QueryFilter::Group { operator, filters } => Ok(QueryFilter::Group {
            operator: operator.clone(),
            filters: filters
                .iter()
                .map(|f| qualify_filter(f, default_table))
                .collect::<Result<_, _>>()?,
        }),
    }
}

pub fn qualify_field(field: &str, default_table: &str) -> Result<String, StoreError> {
    Ok(ColumnRef::parse(field)?.qualified_key(default_table))
}

/// Prefix every column of `row` with `table.`
pub fn qualify_row(table: &str, row: &Record, into: &mut Record) {
    for (column, value) in row {
        into.insert(format!("{}.{}", table, column), value.clone());
    }
}

fn non_null<'a>(row: &'a Record, key: &str) -> Option<&'a Value> {
    row.get(key).filter(|v| !v.is_null())
}

pub fn eval_filter(row: &Record, filter: &QueryFilter) -> bool {
    match filter {
        QueryFilter::Condition(condition) => eval_condition(row, condition),
        QueryFilter::Group { operator, filters } => match operator {
            LogicalOperator::And => filters.iter().all(|f| eval_filter(row, f)),
            LogicalOperator::Or => filters.iter().any(|f| eval_filter(row, f)),
        },
    }
}

fn eval_condition(row: &Record, condition: &QueryCondition) -> bool {
    let field = non_null(row, &condition.field);

    let (operator, expected) = match (&condition.operator, &condition.value) {
        (QueryOperator::Eq, None) | (QueryOperator::IsNull, _) => return field.is_none(),
        (QueryOperator::Ne, None) | (QueryOperator::IsNotNull, _) => return field.is_some(),
        (QueryOperator::NotIn, expected) => {
            return match (field, expected) {
                (Some(v), Some(Value::Array(set))) => !set.iter().any(|x| values_equal(v, x)),
                (None, Some(Value::Array(set))) if !set.is_empty() => false,
                _ => true,
            };
        }
        (_, None) => return false,
        (operator, Some(expected)) => (operator, expected),
    };

    let Some(actual) = field else {
        return false;
    };

    match operator {
        QueryOperator::Eq => values_equal(actual, expected),
        QueryOperator::Ne => !expected.is_null() && !values_equal(actual, expected),
        QueryOperator::Gt => compare_values(actual, expected) == Some(Ordering::Greater),
        QueryOperator::Gte => matches!(
            compare_values(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        QueryOperator::Lt => compare_values(actual, expected) == Some(Ordering::Less),
        QueryOperator::Lte => matches!(
            compare_values(actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        QueryOperator::Like | QueryOperator::ILike => match (actual, expected) {
            (Value::String(text), Value::String(pattern)) => {
                like_match(text, pattern, *operator == QueryOperator::ILike)
            }
            _ => false,
        },
        QueryOperator::In => match expected {
            Value::Array(set) => set.iter().any(|x| values_equal(actual, x)),
            _ => false,
        },
        QueryOperator::NotIn | QueryOperator::IsNull | QueryOperator::IsNotNull => false,
    }
}

/// Wire format of timestamp fields, e.g. `2024-01-15T09:00:00.000Z`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Parse RFC 3339 text, or a zone-less `YYYY-MM-DD[T ]HH:MM:SS[.f]` read as UTC
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

/// Render a timestamp value in the wire format; anything unparsable is kept as is
pub fn format_timestamp(value: &Value) -> Value {
    match value {
        Value::String(text) => match parse_timestamp(text) {
            Some(timestamp) => Value::String(timestamp.format(TIMESTAMP_FORMAT).to_string()),
            None => value.clone(),
        },
        other => other.clone(),
    }
}

/// SQL equality: NULL equals nothing, numbers compare by value
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(_), Value::Number(_)) | (Value::String(_), Value::String(_)) => {
            compare_values(a, b) == Some(Ordering::Equal)
        }
        _ => a == b,
    }
}

/// Compare two non-null scalars of the same kind
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64()?, y.as_f64()?);
            Some(x.total_cmp(&y))
        }
        (Value::String(x), Value::String(y)) => match (parse_timestamp(x), parse_timestamp(y)) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => Some(x.cmp(y)),
        },
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}

/// Ascending sort comparison with NULL (or missing) greater than any value
fn compare_for_sort(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            compare_values(x, y).unwrap_or_else(|| type_rank(x).cmp(&type_rank(y)))
        }
    }
}

/// Compare two rows by the qualified sort keys
pub fn compare_rows(a: &Record, b: &Record, order_by: &[(String, SortOrder)]) -> Ordering {
    for (key, order) in order_by {
        let ord = order.apply(compare_for_sort(a.get(key), b.get(key)));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LikeToken {
    AnySequence,
    AnyChar,
    Literal(char),
}

fn tokenize_like(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        let token = match c {
            '%' => LikeToken::AnySequence,
            '_' => LikeToken::AnyChar,
            '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
            other => LikeToken::Literal(other),
        };
        tokens.push(token);
    }

    tokens
}

/// SQL LIKE matching with `%`, `_` and backslash escapes
pub fn like_match(text: &str, pattern: &str, case_insensitive: bool) -> bool {
    let (text, pattern) = if case_insensitive {
        (text.to_lowercase(), pattern.to_lowercase())
    } else {
        (text.to_string(), pattern.to_string())
    };

    let text: Vec<char> = text.chars().collect();
    let tokens = tokenize_like(&pattern);

    let (mut t, mut p) = (0, 0);
    // Position of the last `%` and the text index it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(LikeToken::Literal(c)) if *c == text[t] => {
                t += 1;
                p += 1;
                continue;
            }
            Some(LikeToken::AnyChar) => {
                t += 1;
                p += 1;
                continue;
            }
            Some(LikeToken::AnySequence) => {
                backtrack = Some((p, t));
                p += 1;
                continue;
            }
            _ => {}
        }

        match backtrack {
            Some((star, absorbed)) => {
                p = star + 1;
                t = absorbed + 1;
                backtrack = Some((star, absorbed + 1));
            }
            None => return false,
        }
    }

    tokens[p..].iter().all(|token| *token == LikeToken::AnySequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test rows must be objects"),
        }
    }

    #[test]
    fn test_like_match() {
        assert!(like_match("Fundamentals of Observability", "%observ%", true));
        assert!(!like_match("Fundamentals of Observability", "%observ%", false));
        assert!(like_match("abc", "a_c", false));
        assert!(like_match("abc", "%", false));
        assert!(like_match("", "%", false));
        assert!(!like_match("abc", "ab", false));
        assert!(like_match("100% done", "%100\\%%", false));
        assert!(!like_match("100 done", "%100\\%%", false));
        assert!(like_match("a_b", "a\\_b", false));
        assert!(!like_match("axb", "a\\_b", false));
        assert!(like_match("mississippi", "%iss%ppi", false));
    }

    #[test]
    fn test_null_never_compares() {
        let r = row(json!({"courses.published_at": null}));

        assert!(!eval_filter(&r, &QueryFilter::eq("courses.published_at", json!("x"))));
        assert!(!eval_filter(&r, &QueryFilter::ne("courses.published_at", json!("x"))));
        assert!(eval_filter(&r, &QueryFilter::is_null("courses.published_at")));
        assert!(eval_filter(&r, &QueryFilter::is_null("courses.missing")));
        assert!(!eval_filter(&r, &QueryFilter::is_not_null("courses.published_at")));
    }

    #[test]
    fn test_numeric_equality_ignores_representation() {
        let r = row(json!({"courses.rating": 4.0}));
        assert!(eval_filter(&r, &QueryFilter::eq("courses.rating", json!(4))));
        assert!(eval_filter(&r, &QueryFilter::gte("courses.rating", json!(3.5))));
        assert!(!eval_filter(&r, &QueryFilter::gt("courses.rating", json!(4))));
    }

    #[test]
    fn test_in_and_not_in() {
        let r = row(json!({"courses.level": "beginner"}));

        assert!(eval_filter(&r, &QueryFilter::in_values("courses.level", vec![json!("beginner")])));
        assert!(!eval_filter(&r, &QueryFilter::in_values("courses.level", vec![])));
        assert!(eval_filter(&r, &QueryFilter::not_in_values("courses.level", vec![])));
        assert!(!eval_filter(
            &r,
            &QueryFilter::not_in_values("courses.level", vec![json!("beginner")])
        ));
    }

    #[test]
    fn test_empty_groups() {
        let r = row(json!({}));
        assert!(eval_filter(&r, &QueryFilter::and(vec![])));
        assert!(!eval_filter(&r, &QueryFilter::or(vec![])));
    }

    #[test]
    fn test_sort_puts_nulls_last_ascending_first_descending() {
        let with = row(json!({"t.v": 1}));
        let without = row(json!({"t.v": null}));
        let asc = [("t.v".to_string(), SortOrder::Asc)];
        let desc = [("t.v".to_string(), SortOrder::Desc)];

        assert_eq!(compare_rows(&with, &without, &asc), Ordering::Less);
        assert_eq!(compare_rows(&with, &without, &desc), Ordering::Greater);
    }

    #[test]
    fn test_timestamps_sort_as_instants() {
        // chrono drops zero fractions, so these two differ in text length
        let older = row(json!({"t.created_at": "2024-01-01T00:00:00Z"}));
        let newer = row(json!({"t.created_at": "2024-01-01T00:00:00.500Z"}));
        let desc = [("t.created_at".to_string(), SortOrder::Desc)];

        assert_eq!(compare_rows(&newer, &older, &desc), Ordering::Less);
        assert_eq!(
            compare_values(&json!("2024-01-01T01:00:00+01:00"), &json!("2024-01-01T00:00:00.000Z")),
            Some(Ordering::Equal)
        );
        assert!(values_equal(
            &json!("2024-01-01T00:00:00Z"),
            &json!("2024-01-01 00:00:00")
        ));
    }

    #[test]
    fn test_plain_strings_compare_as_text() {
        assert_eq!(compare_values(&json!("b"), &json!("a")), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!("2024"), &json!("2024-01-01T00:00:00Z")), Some(Ordering::Less));
        assert!(!values_equal(&json!("c1"), &json!("c2")));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp(&json!("2024-01-15T09:00:00Z")),
            json!("2024-01-15T09:00:00.000Z")
        );
        assert_eq!(
            format_timestamp(&json!("2024-01-15T10:00:00.5+01:00")),
            json!("2024-01-15T09:00:00.500Z")
        );
        assert_eq!(format_timestamp(&json!("not a date")), json!("not a date"));
        assert_eq!(format_timestamp(&Value::Null), Value::Null);
    }

    #[test]
    fn test_qualify_filter() {
        let filter = QueryFilter::and(vec![
            QueryFilter::eq("category", json!("Performance")),
            QueryFilter::eq("users.name", json!("Jane Expert")),
        ]);

        let qualified = qualify_filter(&filter, "courses").unwrap();

        assert_eq!(
            qualified,
            QueryFilter::and(vec![
                QueryFilter::eq("courses.category", json!("Performance")),
                QueryFilter::eq("users.name", json!("Jane Expert")),
            ])
        );
    }
}
