/// Represents a field selection in a SELECT clause
#[derive(Debug, Clone, PartialEq)]
pub enum SelectField {
    /// Every column of the primary table, keyed by column name
    All,
    /// Select specific field, keyed by its column name
    Field(String),
    /// Select field under a different output key
    FieldWithAlias { field: String, alias: String },
    /// UTC timestamp column rendered as RFC 3339 with millisecond precision
    Timestamp { field: String, alias: String },
}

impl SelectField {
    pub fn field(field: impl Into<String>) -> Self {
        SelectField::Field(field.into())
    }

    /// Create a field with alias
    pub fn field_as(field: impl Into<String>, alias: impl Into<String>) -> Self {
        SelectField::FieldWithAlias {
            field: field.into(),
            alias: alias.into(),
        }
    }

    /// Create a timestamp field; both backends emit `YYYY-MM-DDTHH:MM:SS.mmmZ`
    pub fn timestamp_as(field: impl Into<String>, alias: impl Into<String>) -> Self {
        SelectField::Timestamp {
            field: field.into(),
            alias: alias.into(),
        }
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, SelectField::Timestamp { .. })
    }

    /// Key this field takes in the output record (`None` for `All`)
    pub fn output_key(&self) -> Option<&str> {
        match self {
            SelectField::All => None,
            SelectField::Field(field) => Some(field.rsplit('.').next().unwrap_or(field)),
            SelectField::FieldWithAlias { alias, .. } | SelectField::Timestamp { alias, .. } => {
                Some(alias)
            }
        }
    }

    /// Source column reference (`None` for `All`)
    pub fn source(&self) -> Option<&str> {
        match self {
            SelectField::All => None,
            SelectField::Field(field)
            | SelectField::FieldWithAlias { field, .. }
            | SelectField::Timestamp { field, .. } => Some(field),
        }
    }
}
