//! Demo dataset for the memory backend
//!
//! Three categories, a demo student, two instructors, three courses with
//! lessons, and one enrollment with lesson progress and a review.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use store_object::{MemoryStore, StoreError};
use tracing::info;

use crate::schema::{
    Category, Certificate, Course, Enrollment, Lesson, LessonProgress, Review, User,
};

pub const DEMO_STUDENT_ID: &str = "user-demo-student";
pub const INSTRUCTOR_OBSERVABILITY_ID: &str = "user-john-instructor";
pub const INSTRUCTOR_ERRORS_ID: &str = "user-jane-expert";

pub const COURSE_OBSERVABILITY_ID: &str = "course-fundamentals-of-observability";
pub const COURSE_ERRORS_ID: &str = "course-advanced-error-tracking";
pub const COURSE_PERFORMANCE_ID: &str = "course-performance-optimization";

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

fn days(n: i64) -> DateTime<Utc> {
    epoch() + Duration::days(n)
}

pub fn categories() -> Vec<Category> {
    [
        ("observability", "Observability", "🔍", 1),
        ("error-handling", "Error Handling", "🐛", 2),
        ("performance", "Performance", "⚡", 3),
    ]
    .into_iter()
    .map(|(slug, name, icon, order)| Category {
        id: format!("category-{}", slug),
        name: name.to_string(),
        slug: slug.to_string(),
        description: Some(format!("Learn about {} best practices", name)),
        icon: Some(icon.to_string()),
        order,
        created_at: epoch(),
    })
    .collect()
}

pub fn users() -> Vec<User> {
    vec![
        User {
            id: DEMO_STUDENT_ID.to_string(),
            email: "demo@student.com".to_string(),
            name: "Demo Student".to_string(),
            role: "student".to_string(),
            avatar_url: None,
            bio: Some("A demo student for testing enrollment functionality".to_string()),
            created_at: epoch(),
            updated_at: epoch(),
        },
        User {
            id: INSTRUCTOR_OBSERVABILITY_ID.to_string(),
            email: "instructor1@academy.dev".to_string(),
            name: "John Instructor".to_string(),
            role: "instructor".to_string(),
            avatar_url: Some(
                "https://ui-avatars.com/api/?name=JI&background=0ea5e9&color=fff&size=128"
                    .to_string(),
            ),
            bio: Some("Senior Developer Advocate specializing in observability".to_string()),
            created_at: epoch(),
            updated_at: epoch(),
        },
        User {
            id: INSTRUCTOR_ERRORS_ID.to_string(),
            email: "instructor2@academy.dev".to_string(),
            name: "Jane Expert".to_string(),
            role: "instructor".to_string(),
            avatar_url: Some(
                "https://ui-avatars.com/api/?name=JE&background=22c55e&color=fff&size=128"
                    .to_string(),
            ),
            bio: Some("Error tracking expert with 10+ years of experience".to_string()),
            created_at: epoch(),
            updated_at: epoch(),
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn course(
    id: &str,
    title: &str,
    description: &str,
    instructor_id: &str,
    category: &str,
    level: &str,
    tags: &[&str],
    price: f64,
    rating: f64,
    review_count: i32,
    is_featured: bool,
    created_at: DateTime<Utc>,
) -> Course {
    let slug = title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    Course {
        id: id.to_string(),
        title: title.to_string(),
        slug,
        description: description.to_string(),
        instructor_id: instructor_id.to_string(),
        thumbnail: None,
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        level: level.to_string(),
        status: "published".to_string(),
        duration: None,
        price,
        rating,
        review_count,
        enrollment_count: 0,
        is_featured,
        prerequisites: Vec::new(),
        learning_objectives: Vec::new(),
        created_at,
        updated_at: created_at,
        published_at: Some(created_at),
    }
}

pub fn courses() -> Vec<Course> {
    vec![
        Course {
            duration: Some("8 hours".to_string()),
            learning_objectives: vec![
                "Understanding observability principles".to_string(),
                "Setting up monitoring systems".to_string(),
                "Creating effective dashboards".to_string(),
            ],
            ..course(
                COURSE_OBSERVABILITY_ID,
                "Fundamentals of Observability",
                "Learn the core concepts of observability and how to implement them in your applications.",
                INSTRUCTOR_OBSERVABILITY_ID,
                "Observability",
                "beginner",
                &["monitoring", "logs", "metrics", "tracing"],
                49.99,
                4.9,
                128,
                true,
                days(0),
            )
        },
        Course {
            duration: Some("10 hours".to_string()),
            prerequisites: vec!["Basic JavaScript knowledge".to_string()],
            ..course(
                COURSE_ERRORS_ID,
                "Advanced Error Tracking",
                "Master the art of error tracking and debugging in complex applications.",
                INSTRUCTOR_ERRORS_ID,
                "Error Handling",
                "intermediate",
                &["errors", "debugging", "exceptions", "troubleshooting"],
                79.99,
                4.8,
                95,
                true,
                days(7),
            )
        },
        Course {
            duration: Some("12 hours".to_string()),
            prerequisites: vec!["Experience with web applications".to_string()],
            ..course(
                COURSE_PERFORMANCE_ID,
                "Performance Optimization Techniques",
                "Learn how to identify and resolve performance bottlenecks in your applications.",
                INSTRUCTOR_OBSERVABILITY_ID,
                "Performance",
                "advanced",
                &["optimization", "profiling", "metrics", "bottlenecks"],
                99.99,
                4.7,
                83,
                false,
                days(14),
            )
        },
    ]
}

pub fn lessons() -> Vec<Lesson> {
    [
        (COURSE_OBSERVABILITY_ID, "Introduction to Observability", "video", 1, true),
        (COURSE_OBSERVABILITY_ID, "Setting Up Monitoring", "text", 2, false),
        (COURSE_ERRORS_ID, "Error Handling Basics", "video", 1, true),
        (COURSE_ERRORS_ID, "Advanced Debugging Techniques", "text", 2, false),
        (COURSE_PERFORMANCE_ID, "Profiling Fundamentals", "video", 1, true),
        (COURSE_PERFORMANCE_ID, "Finding Bottlenecks", "quiz", 2, false),
    ]
    .into_iter()
    .map(|(course_id, title, lesson_type, order, is_free)| {
        let slug = title.to_lowercase().replace(' ', "-");
        Lesson {
            id: format!("lesson-{}", slug),
            course_id: course_id.to_string(),
            title: title.to_string(),
            slug,
            description: None,
            lesson_type: lesson_type.to_string(),
            content: (lesson_type == "text").then(|| format!("# {}", title)),
            video_url: None,
            duration: Some("30 min".to_string()),
            order,
            is_free,
            resources: vec![json!({"title": "Slides", "url": "https://academy.dev/slides", "type": "link"})],
            created_at: epoch(),
            updated_at: epoch(),
        }
    })
    .collect()
}

pub fn enrollments() -> Vec<Enrollment> {
    vec![Enrollment {
        id: "enrollment-demo-observability".to_string(),
        user_id: DEMO_STUDENT_ID.to_string(),
        course_id: COURSE_OBSERVABILITY_ID.to_string(),
        enrolled_at: days(20),
        completed_at: None,
        last_accessed_at: Some(days(21)),
        progress: 50,
        certificate_id: None,
    }]
}

pub fn lesson_progress() -> Vec<LessonProgress> {
    vec![LessonProgress {
        id: "progress-demo-intro".to_string(),
        user_id: DEMO_STUDENT_ID.to_string(),
        lesson_id: "lesson-introduction-to-observability".to_string(),
        enrollment_id: "enrollment-demo-observability".to_string(),
        completed_at: Some(days(21)),
        time_spent: 1800,
        last_position: Some(1800),
        notes: None,
        created_at: days(20),
        updated_at: days(21),
    }]
}

pub fn reviews() -> Vec<Review> {
    vec![Review {
        id: "review-demo-observability".to_string(),
        user_id: DEMO_STUDENT_ID.to_string(),
        course_id: COURSE_OBSERVABILITY_ID.to_string(),
        rating: 5,
        comment: Some("Clear explanations and useful dashboards.".to_string()),
        created_at: days(21),
        updated_at: days(21),
    }]
}

pub fn certificates() -> Vec<Certificate> {
    Vec::new()
}

/// Insert the demo dataset into `store`
pub async fn load(store: &MemoryStore) -> Result<(), StoreError> {
    store.insert_many(&categories()).await?;
    store.insert_many(&users()).await?;
    store.insert_many(&courses()).await?;
    store.insert_many(&lessons()).await?;
    store.insert_many(&enrollments()).await?;
    store.insert_many(&lesson_progress()).await?;
    store.insert_many(&reviews()).await?;
    store.insert_many(&certificates()).await?;

    info!(
        "Seeded demo data: {} courses, {} lessons",
        store.row_count("courses").await,
        store.row_count("lessons").await
    );
    Ok(())
}
