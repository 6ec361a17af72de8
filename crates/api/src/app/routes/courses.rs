use std::sync::Arc;

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use campus_core::CourseId;
use campus_courses::{CourseFilter, CoursePatch, NewCourse};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_course).get(list_courses))
        .route("/:id", get(get_course).patch(update_course))
}

pub async fn create_course(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<NewCourse>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::body_rejection_to_response(e),
    };
    match services.courses_create(body) {
        Ok(course) => (StatusCode::CREATED, Json(course)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /courses?coursenumber=&instructor=&time=&location=&capacity=&enrollment=
///
/// `enrollment` reflects the seat ledger at read time.
pub async fn list_courses(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<CourseFilter>, QueryRejection>,
) -> axum::response::Response {
    match query {
        Ok(Query(filter)) => {
            (StatusCode::OK, Json(services.courses_list(&filter))).into_response()
        }
        Err(e) => errors::query_rejection_to_response(e),
    }
}

pub async fn get_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CourseId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.courses_get(id) {
        Some(course) => (StatusCode::OK, Json(course)).into_response(),
        None => errors::not_found("course"),
    }
}

pub async fn update_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<CoursePatch>, JsonRejection>,
) -> axum::response::Response {
    let id: CourseId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let Json(patch) = match body {
        Ok(b) => b,
        Err(e) => return errors::body_rejection_to_response(e),
    };
    match services.courses_update(id, patch) {
        Ok(course) => (StatusCode::OK, Json(course)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
