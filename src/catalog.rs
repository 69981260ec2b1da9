//! Listing definitions for every API resource
//!
//! Each function returns a `ResourceListing`: the table, the camelCase output
//! projection, the LEFT join used for enrichment, the filter keys the route
//! recognizes and the fixed ordering.

use store_object::{FilterRule, ResourceListing, SelectField, SortOrder};

/// Project `table.column` under each output key; `*_at` columns are timestamps
fn columns(table: &str, fields: &[(&str, &str)]) -> Vec<SelectField> {
    fields
        .iter()
        .map(|(column, key)| {
            let source = format!("{}.{}", table, column);
            if column.ends_with("_at") {
                SelectField::timestamp_as(source, *key)
            } else {
                SelectField::field_as(source, *key)
            }
        })
        .collect()
}

fn course_summary_fields() -> Vec<SelectField> {
    let mut fields = columns(
        "courses",
        &[
            ("id", "id"),
            ("title", "title"),
            ("slug", "slug"),
            ("description", "description"),
        ],
    );
    fields.push(SelectField::field_as("users.name", "instructor"));
    fields.extend(columns(
        "courses",
        &[
            ("instructor_id", "instructorId"),
            ("thumbnail", "thumbnail"),
            ("category", "category"),
            ("tags", "tags"),
            ("level", "level"),
            ("duration", "duration"),
            ("price", "price"),
            ("rating", "rating"),
            ("review_count", "reviewCount"),
            ("enrollment_count", "enrollmentCount"),
            ("is_featured", "isFeatured"),
            ("created_at", "createdAt"),
            ("published_at", "publishedAt"),
        ],
    ));
    fields
}

fn lesson_fields() -> Vec<SelectField> {
    columns(
        "lessons",
        &[
            ("id", "id"),
            ("course_id", "courseId"),
            ("title", "title"),
            ("slug", "slug"),
            ("description", "description"),
            ("type", "type"),
            ("content", "content"),
            ("video_url", "videoUrl"),
            ("duration", "duration"),
            ("order", "order"),
            ("is_free", "isFree"),
            ("resources", "resources"),
            ("created_at", "createdAt"),
            ("updated_at", "updatedAt"),
        ],
    )
}

/// `GET /api/courses`
pub fn courses() -> ResourceListing {
    ResourceListing::new("courses")
        .select_fields(course_summary_fields())
        .join("users", "courses.instructor_id", "users.id")
        .rule(FilterRule::equals("category", "courses.category"))
        .rule(FilterRule::equals("level", "courses.level"))
        .rule(FilterRule::flag("featured", "courses.is_featured"))
        .order_by("courses.created_at", SortOrder::Desc)
}

/// `GET /api/search/courses`
pub fn course_search() -> ResourceListing {
    ResourceListing::new("courses")
        .select_fields(course_summary_fields())
        .join("users", "courses.instructor_id", "users.id")
        .rule(FilterRule::contains(
            "q",
            &["courses.title", "courses.description"],
        ))
        .rule(FilterRule::equals("category", "courses.category"))
        .rule(FilterRule::equals("level", "courses.level"))
        .order_by("courses.created_at", SortOrder::Desc)
}

/// Single course with instructor details; lessons are attached by the handler
pub fn course_detail() -> ResourceListing {
    let mut fields = course_summary_fields();
    fields.extend([
        SelectField::field_as("users.bio", "instructorBio"),
        SelectField::field_as("users.avatar_url", "instructorAvatar"),
        SelectField::field_as("courses.prerequisites", "prerequisites"),
        SelectField::field_as("courses.learning_objectives", "learningObjectives"),
    ]);

    ResourceListing::new("courses")
        .select_fields(fields)
        .join("users", "courses.instructor_id", "users.id")
}

pub fn categories() -> ResourceListing {
    ResourceListing::new("categories")
        .select_fields(columns(
            "categories",
            &[
                ("id", "id"),
                ("name", "name"),
                ("slug", "slug"),
                ("description", "description"),
                ("icon", "icon"),
                ("order", "order"),
                ("created_at", "createdAt"),
            ],
        ))
        .order_by("categories.order", SortOrder::Asc)
        .order_by("categories.name", SortOrder::Asc)
}

/// Lessons of one course; callers scope by `lessons.course_id`
pub fn course_lessons() -> ResourceListing {
    ResourceListing::new("lessons")
        .select_fields(lesson_fields())
        .rule(FilterRule::equals("type", "lessons.type"))
        .rule(FilterRule::flag("free", "lessons.is_free"))
        .order_by("lessons.order", SortOrder::Asc)
}

pub fn lesson() -> ResourceListing {
    ResourceListing::new("lessons")
        .select_fields(lesson_fields())
        .select(SelectField::field_as("courses.title", "courseTitle"))
        .join("courses", "lessons.course_id", "courses.id")
}

/// Reviews of one course; callers scope by `reviews.course_id`
pub fn course_reviews() -> ResourceListing {
    ResourceListing::new("reviews")
        .select_fields(columns(
            "reviews",
            &[
                ("id", "id"),
                ("user_id", "userId"),
                ("course_id", "courseId"),
                ("rating", "rating"),
                ("comment", "comment"),
                ("created_at", "createdAt"),
                ("updated_at", "updatedAt"),
            ],
        ))
        .select(SelectField::field_as("users.name", "userName"))
        .select(SelectField::field_as("users.avatar_url", "userAvatar"))
        .join("users", "reviews.user_id", "users.id")
        .rule(FilterRule::integer("rating", "reviews.rating"))
        .order_by("reviews.created_at", SortOrder::Desc)
}

pub fn user_profile() -> ResourceListing {
    ResourceListing::new("users").select_fields(columns(
        "users",
        &[
            ("id", "id"),
            ("email", "email"),
            ("name", "name"),
            ("role", "role"),
            ("avatar_url", "avatarUrl"),
            ("bio", "bio"),
            ("created_at", "createdAt"),
            ("updated_at", "updatedAt"),
        ],
    ))
}

/// Enrollments of one user; callers scope by `enrollments.user_id`
pub fn user_enrollments() -> ResourceListing {
    ResourceListing::new("enrollments")
        .select_fields(columns(
            "enrollments",
            &[
                ("id", "id"),
                ("user_id", "userId"),
                ("course_id", "courseId"),
                ("enrolled_at", "enrolledAt"),
                ("completed_at", "completedAt"),
                ("last_accessed_at", "lastAccessedAt"),
                ("progress", "progress"),
                ("certificate_id", "certificateId"),
            ],
        ))
        .select_fields(columns(
            "courses",
            &[
                ("title", "courseTitle"),
                ("slug", "courseSlug"),
                ("thumbnail", "courseThumbnail"),
            ],
        ))
        .join("courses", "enrollments.course_id", "courses.id")
        .rule(FilterRule::equals("courseId", "enrollments.course_id"))
        .order_by("enrollments.enrolled_at", SortOrder::Desc)
}

/// Lesson progress of one user; callers scope by `lesson_progress.user_id`
pub fn user_progress() -> ResourceListing {
    ResourceListing::new("lesson_progress")
        .select_fields(columns(
            "lesson_progress",
            &[
                ("id", "id"),
                ("user_id", "userId"),
                ("lesson_id", "lessonId"),
                ("enrollment_id", "enrollmentId"),
                ("completed_at", "completedAt"),
                ("time_spent", "timeSpent"),
                ("last_position", "lastPosition"),
                ("notes", "notes"),
                ("created_at", "createdAt"),
                ("updated_at", "updatedAt"),
            ],
        ))
        .select(SelectField::field_as("lessons.title", "lessonTitle"))
        .join("lessons", "lesson_progress.lesson_id", "lessons.id")
        .rule(FilterRule::equals("lessonId", "lesson_progress.lesson_id"))
        .rule(FilterRule::equals("enrollmentId", "lesson_progress.enrollment_id"))
        .order_by("lesson_progress.updated_at", SortOrder::Desc)
}

/// Certificates of one user; callers scope by `certificates.user_id`
pub fn user_certificates() -> ResourceListing {
    ResourceListing::new("certificates")
        .select_fields(columns(
            "certificates",
            &[
                ("id", "id"),
                ("user_id", "userId"),
                ("course_id", "courseId"),
                ("enrollment_id", "enrollmentId"),
                ("certificate_url", "certificateUrl"),
                ("issued_at", "issuedAt"),
                ("expires_at", "expiresAt"),
            ],
        ))
        .select(SelectField::field_as("courses.title", "courseTitle"))
        .join("courses", "certificates.course_id", "courses.id")
        .rule(FilterRule::equals("courseId", "certificates.course_id"))
        .order_by("certificates.issued_at", SortOrder::Desc)
}
