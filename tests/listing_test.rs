use academy::catalog;
use academy::schema::{Course, User};
use academy::seed;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use store_object::{FilterParams, MemoryStore, Record, RecordStore, TableMetadata};

fn instructor(id: &str, name: &str) -> User {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    User {
        id: id.to_string(),
        email: format!("{}@academy.dev", id),
        name: name.to_string(),
        role: "instructor".to_string(),
        avatar_url: None,
        bio: None,
        created_at: at,
        updated_at: at,
    }
}

fn course(id: &str, category: &str, level: &str, instructor_id: &str, day: u32, featured: bool) -> Course {
    let at = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
    Course {
        id: id.to_string(),
        title: format!("Course {}", id),
        slug: id.to_string(),
        description: format!("About {}", category),
        instructor_id: instructor_id.to_string(),
        thumbnail: None,
        category: category.to_string(),
        tags: vec!["tag".to_string()],
        level: level.to_string(),
        status: "published".to_string(),
        duration: None,
        price: 10.0,
        rating: 4.5,
        review_count: 0,
        enrollment_count: 0,
        is_featured: featured,
        prerequisites: vec![],
        learning_objectives: vec![],
        created_at: at,
        updated_at: at,
        published_at: None,
    }
}

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    seed::load(&store).await.unwrap();
    store
}

fn ids(rows: &[Record]) -> Vec<String> {
    rows.iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_no_filters_returns_everything_newest_first() {
    let store = seeded_store().await;
    let rows = catalog::courses()
        .list(&store, &FilterParams::new())
        .await
        .unwrap();

    assert_eq!(rows.len(), seed::courses().len());
    assert_eq!(
        ids(&rows),
        vec![
            seed::COURSE_PERFORMANCE_ID,
            seed::COURSE_ERRORS_ID,
            seed::COURSE_OBSERVABILITY_ID,
        ]
    );
}

#[tokio::test]
async fn test_unrecognized_keys_equal_unfiltered() {
    let store = seeded_store().await;
    let listing = catalog::courses();

    let unfiltered = listing.list(&store, &FilterParams::new()).await.unwrap();
    let ignored = listing
        .list(
            &store,
            &FilterParams::new().with("sort", "title").with("page", "2").with("category", ""),
        )
        .await
        .unwrap();

    assert_eq!(unfiltered, ignored);
}

#[tokio::test]
async fn test_category_filter_returns_only_match_with_instructor() {
    let store = MemoryStore::new();
    store.insert(&instructor("u1", "John Instructor")).await.unwrap();
    store.insert(&instructor("u2", "Jane Expert")).await.unwrap();
    store.insert(&course("c1", "Performance", "advanced", "u1", 1, false)).await.unwrap();
    store.insert(&course("c2", "Observability", "beginner", "u2", 2, true)).await.unwrap();
    store.insert(&course("c3", "Error Handling", "beginner", "u2", 3, false)).await.unwrap();

    let params = FilterParams::new().with("category", "Performance");
    let rows = catalog::courses().list(&store, &params).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], json!("c1"));
    assert_eq!(rows[0]["instructor"], json!("John Instructor"));
    assert_eq!(rows[0]["isFeatured"], json!(false));
}

#[tokio::test]
async fn test_combined_filters_match_manual_selection() {
    let store = MemoryStore::new();
    store.insert(&instructor("u1", "John Instructor")).await.unwrap();
    let fixtures = [
        course("a", "Performance", "beginner", "u1", 1, true),
        course("b", "Performance", "beginner", "u1", 2, false),
        course("c", "Performance", "advanced", "u1", 3, true),
        course("d", "Observability", "beginner", "u1", 4, true),
        course("e", "Performance", "beginner", "u1", 5, true),
    ];
    store.insert_many(&fixtures).await.unwrap();

    let params = FilterParams::new()
        .with("category", "Performance")
        .with("level", "beginner")
        .with("featured", "true");
    let rows = catalog::courses().list(&store, &params).await.unwrap();

    let mut expected: Vec<&Course> = fixtures
        .iter()
        .filter(|c| c.category == "Performance" && c.level == "beginner" && c.is_featured)
        .collect();
    expected.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    assert_eq!(
        ids(&rows),
        expected.iter().map(|c| c.id.clone()).collect::<Vec<_>>()
    );
    for row in &rows {
        assert_eq!(row["category"], json!("Performance"));
        assert_eq!(row["level"], json!("beginner"));
        assert_eq!(row["isFeatured"], json!(true));
    }
}

#[tokio::test]
async fn test_orphan_course_keeps_row_with_null_instructor() {
    let store = MemoryStore::new();
    store.create_table(User::table_name()).await.unwrap();
    store.insert(&course("orphan", "Performance", "advanced", "deleted-user", 1, false)).await.unwrap();

    let rows = catalog::courses()
        .list(&store, &FilterParams::new())
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["instructor"], Value::Null);
    assert_eq!(rows[0]["instructorId"], json!("deleted-user"));
}

#[tokio::test]
async fn test_equal_timestamps_order_by_id() {
    let store = MemoryStore::new();
    store.insert(&instructor("u1", "John Instructor")).await.unwrap();
    for id in ["course-c", "course-a", "course-b"] {
        store.insert(&course(id, "Performance", "beginner", "u1", 9, false)).await.unwrap();
    }

    let rows = catalog::courses()
        .list(&store, &FilterParams::new())
        .await
        .unwrap();

    assert_eq!(ids(&rows), vec!["course-a", "course-b", "course-c"]);
}

#[tokio::test]
async fn test_sub_second_created_at_orders_newest_first() {
    let store = MemoryStore::new();
    store.insert(&instructor("u1", "John Instructor")).await.unwrap();

    let older = course("older", "Performance", "beginner", "u1", 9, false);
    let mut newer = course("newer", "Performance", "beginner", "u1", 9, false);
    newer.created_at = older.created_at + chrono::Duration::milliseconds(500);
    store.insert(&older).await.unwrap();
    store.insert(&newer).await.unwrap();

    let rows = catalog::courses()
        .list(&store, &FilterParams::new())
        .await
        .unwrap();

    assert_eq!(ids(&rows), vec!["newer", "older"]);
    assert_eq!(rows[0]["createdAt"], json!("2024-03-09T12:00:00.500Z"));
    assert_eq!(rows[1]["createdAt"], json!("2024-03-09T12:00:00.000Z"));
}

#[tokio::test]
async fn test_malformed_filter_values_yield_empty_results() {
    let store = seeded_store().await;

    let rows = catalog::courses()
        .list(&store, &FilterParams::new().with("level", "expert"))
        .await
        .unwrap();
    assert!(rows.is_empty());

    let reviews = catalog::course_reviews()
        .list(&store, &FilterParams::new().with("rating", "five"))
        .await
        .unwrap();
    assert!(reviews.is_empty());
}

#[tokio::test]
async fn test_single_lookup() {
    let store = seeded_store().await;
    let listing = catalog::course_detail();

    let found = listing
        .find(&store, "courses.id", seed::COURSE_ERRORS_ID)
        .await
        .unwrap();
    assert_eq!(found["instructor"], json!("Jane Expert"));
    assert_eq!(found["prerequisites"], json!(["Basic JavaScript knowledge"]));

    let missing = listing.find(&store, "courses.id", "nope").await.unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn test_search_is_case_insensitive_across_title_and_description() {
    let store = seeded_store().await;
    let listing = catalog::course_search();

    let by_title = listing
        .list(&store, &FilterParams::new().with("q", "OBSERVABILITY"))
        .await
        .unwrap();
    assert_eq!(ids(&by_title), vec![seed::COURSE_OBSERVABILITY_ID]);

    let by_description = listing
        .list(&store, &FilterParams::new().with("q", "bottlenecks"))
        .await
        .unwrap();
    assert_eq!(ids(&by_description), vec![seed::COURSE_PERFORMANCE_ID]);

    let wildcard = listing
        .list(&store, &FilterParams::new().with("q", "%"))
        .await
        .unwrap();
    assert!(wildcard.is_empty());
}

#[tokio::test]
async fn test_categories_ordered_by_position() {
    let store = seeded_store().await;
    let rows = catalog::categories()
        .list(&store, &FilterParams::new())
        .await
        .unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Observability", "Error Handling", "Performance"]);
}

#[tokio::test]
async fn test_fetch_one_through_trait_object() {
    let store: std::sync::Arc<dyn RecordStore> = std::sync::Arc::new(seeded_store().await);
    let user = catalog::user_profile()
        .find(store.as_ref(), "users.id", seed::DEMO_STUDENT_ID)
        .await
        .unwrap();

    assert_eq!(user["name"], json!("Demo Student"));
    assert_eq!(user["avatarUrl"], Value::Null);
}
