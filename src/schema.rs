//! Typed entities for the academy tables
//!
//! Field names match the column names, so `TableMetadata::to_record` yields
//! rows in the same shape PostgreSQL returns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use store_object::TableMetadata;

macro_rules! table {
    ($entity:ty => $name:literal) => {
        impl TableMetadata for $entity {
            fn table_name() -> &'static str {
                $name
            }
        }
    };
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    /// `student`, `instructor` or `admin`
    pub role: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub instructor_id: String,
    pub thumbnail: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    /// `beginner`, `intermediate` or `advanced`
    pub level: String,
    /// `draft`, `published` or `archived`
    pub status: String,
    pub duration: Option<String>,
    pub price: f64,
    pub rating: f64,
    pub review_count: i32,
    pub enrollment_count: i32,
    pub is_featured: bool,
    pub prerequisites: Vec<String>,
    pub learning_objectives: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    /// `video`, `text`, `quiz` or `assignment`
    #[serde(rename = "type")]
    pub lesson_type: String,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub duration: Option<String>,
    pub order: i32,
    pub is_free: bool,
    pub resources: Vec<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    /// Percent complete, 0-100
    pub progress: i32,
    pub certificate_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonProgress {
    pub id: String,
    pub user_id: String,
    pub lesson_id: String,
    pub enrollment_id: String,
    pub completed_at: Option<DateTime<Utc>>,
    /// Seconds
    pub time_spent: i32,
    pub last_position: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub enrollment_id: String,
    pub certificate_url: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Every table the API reads from
pub const TABLES: [&str; 8] = [
    "users",
    "courses",
    "lessons",
    "enrollments",
    "lesson_progress",
    "reviews",
    "categories",
    "certificates",
];

table!(User => "users");
table!(Course => "courses");
table!(Lesson => "lessons");
table!(Enrollment => "enrollments");
table!(LessonProgress => "lesson_progress");
table!(Review => "reviews");
table!(Category => "categories");
table!(Certificate => "certificates");
