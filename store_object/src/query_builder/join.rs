/// Represents the type of SQL JOIN operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN - returns rows that have a match in the related table
    Inner,
    /// LEFT JOIN - returns every primary row, related columns null when unmatched
    Left,
}

impl JoinType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}

/// A single join against a related table (`ON left_field = right_field`)
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    /// Table to join with
    pub table: String,
    /// Foreign key on the primary side, e.g. `courses.instructor_id`
    pub left_field: String,
    /// Key on the related side, e.g. `users.id`
    pub right_field: String,
}

impl JoinClause {
    pub fn new(
        join_type: JoinType,
        table: impl Into<String>,
        left_field: impl Into<String>,
        right_field: impl Into<String>,
    ) -> Self {
        Self {
            join_type,
            table: table.into(),
            left_field: left_field.into(),
            right_field: right_field.into(),
        }
    }

    pub fn left(
        table: impl Into<String>,
        left_field: impl Into<String>,
        right_field: impl Into<String>,
    ) -> Self {
        Self::new(JoinType::Left, table, left_field, right_field)
    }

    pub fn inner(
        table: impl Into<String>,
        left_field: impl Into<String>,
        right_field: impl Into<String>,
    ) -> Self {
        Self::new(JoinType::Inner, table, left_field, right_field)
    }
}
