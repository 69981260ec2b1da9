//! HTTP layer
//!
//! Every handler runs one catalog listing against the shared store and maps
//! store failures to a generic 500 body.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode, Uri, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use store_object::{FilterParams, QueryFilter, Record, RecordStore, StoreError};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::catalog;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Route not found: {method} {path}")]
    RouteNotFound { method: Method, path: String },
}

impl ApiError {
    fn store(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Store { message, source }
    }

    /// `NotFound` stays a 404, anything else is a store failure
    fn lookup(not_found: &'static str, message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| {
            if source.is_not_found() {
                ApiError::NotFound(not_found)
            } else {
                ApiError::Store { message, source }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Store { message, source } => {
                error!(error = %source, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::RouteNotFound { .. } => {
                info!("Unmatched route: {}", self);
                let body = json!({
                    "error": true,
                    "message": self.to_string(),
                    "code": "NOT_FOUND",
                });
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
        }
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Build the API router with CORS and request tracing
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(index_handler))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .route("/api/courses", get(courses_handler))
        .route("/api/courses/categories", get(categories_handler))
        .route("/api/courses/{id}", get(course_handler))
        .route("/api/courses/{id}/lessons", get(course_lessons_handler))
        .route("/api/courses/{id}/reviews", get(course_reviews_handler))
        .route("/api/lessons/{id}", get(lesson_handler))
        .route("/api/users/{id}", get(user_handler))
        .route("/api/users/{id}/enrollments", get(user_enrollments_handler))
        .route("/api/users/{id}/progress", get(user_progress_handler))
        .route("/api/users/{id}/certificates", get(user_certificates_handler))
        .route("/api/search/courses", get(search_courses_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn index_handler() -> Json<Value> {
    Json(json!({
        "message": "Academy API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn fallback_handler(method: Method, uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        method,
        path: uri.path().to_string(),
    }
}

async fn courses_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Record>> {
    let params = FilterParams::from(query);
    let courses = catalog::courses()
        .list(state.store.as_ref(), &params)
        .await
        .map_err(ApiError::store("Failed to retrieve courses"))?;

    info!(count = courses.len(), filters = ?params, "Courses retrieved successfully");
    Ok(Json(courses))
}

async fn categories_handler(State(state): State<AppState>) -> ApiResult<Vec<Record>> {
    let categories = catalog::categories()
        .list(state.store.as_ref(), &FilterParams::new())
        .await
        .map_err(ApiError::store("Failed to retrieve categories"))?;

    Ok(Json(categories))
}

async fn course_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Record> {
    let store = state.store.as_ref();

    let mut course = catalog::course_detail()
        .find(store, "courses.id", &id)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                warn!(course_id = %id, "Course not found");
            }
            ApiError::lookup("Course not found", "Failed to retrieve course")(e)
        })?;

    let lessons = catalog::course_lessons()
        .list_scoped(
            store,
            &FilterParams::new(),
            vec![QueryFilter::eq("lessons.course_id", Value::String(id.clone()))],
        )
        .await
        .map_err(ApiError::store("Failed to retrieve course"))?;

    info!(course_id = %id, lesson_count = lessons.len(), "Course retrieved successfully");

    course.insert(
        "lessons".to_string(),
        Value::Array(lessons.into_iter().map(Value::Object).collect()),
    );
    Ok(Json(course))
}

async fn course_lessons_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Record>> {
    let lessons = catalog::course_lessons()
        .list_scoped(
            state.store.as_ref(),
            &FilterParams::from(query),
            vec![QueryFilter::eq("lessons.course_id", Value::String(id))],
        )
        .await
        .map_err(ApiError::store("Failed to retrieve lessons"))?;

    Ok(Json(lessons))
}

async fn course_reviews_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Record>> {
    let reviews = catalog::course_reviews()
        .list_scoped(
            state.store.as_ref(),
            &FilterParams::from(query),
            vec![QueryFilter::eq("reviews.course_id", Value::String(id))],
        )
        .await
        .map_err(ApiError::store("Failed to retrieve reviews"))?;

    Ok(Json(reviews))
}

async fn lesson_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Record> {
    let lesson = catalog::lesson()
        .find(state.store.as_ref(), "lessons.id", &id)
        .await
        .map_err(ApiError::lookup("Lesson not found", "Failed to retrieve lesson"))?;

    Ok(Json(lesson))
}

async fn user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Record> {
    let user = catalog::user_profile()
        .find(state.store.as_ref(), "users.id", &id)
        .await
        .map_err(ApiError::lookup("User not found", "Failed to retrieve user"))?;

    Ok(Json(user))
}

async fn user_enrollments_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Record>> {
    let enrollments = catalog::user_enrollments()
        .list_scoped(
            state.store.as_ref(),
            &FilterParams::from(query),
            vec![QueryFilter::eq("enrollments.user_id", Value::String(id))],
        )
        .await
        .map_err(ApiError::store("Failed to retrieve enrollments"))?;

    Ok(Json(enrollments))
}

async fn user_progress_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Record>> {
    let progress = catalog::user_progress()
        .list_scoped(
            state.store.as_ref(),
            &FilterParams::from(query),
            vec![QueryFilter::eq("lesson_progress.user_id", Value::String(id))],
        )
        .await
        .map_err(ApiError::store("Failed to retrieve progress"))?;

    Ok(Json(progress))
}

async fn user_certificates_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Record>> {
    let certificates = catalog::user_certificates()
        .list_scoped(
            state.store.as_ref(),
            &FilterParams::from(query),
            vec![QueryFilter::eq("certificates.user_id", Value::String(id))],
        )
        .await
        .map_err(ApiError::store("Failed to retrieve certificates"))?;

    Ok(Json(certificates))
}

async fn search_courses_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Record>> {
    let params = FilterParams::from(query);
    let courses = catalog::course_search()
        .list(state.store.as_ref(), &params)
        .await
        .map_err(ApiError::store("Failed to search courses"))?;

    info!(count = courses.len(), filters = ?params, "Course search completed");
    Ok(Json(courses))
}
