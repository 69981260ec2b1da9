//! Query builder utilities
//!
//! This module provides SQL query construction utilities.

pub mod builder;
pub mod filter;
pub mod join;
pub mod ordering;
pub mod projection;
pub mod sql_generation;


pub use builder::QueryBuilder;
pub use filter::{escape_like, LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
pub use join::{JoinClause, JoinType};
pub use ordering::SortOrder;
pub use projection::SelectField;
pub use sql_generation::SqlGenerator;
