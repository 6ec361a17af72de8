use std::sync::Arc;

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use campus_core::RegistrationId;
use campus_registrations::{NewRegistration, RegistrationFilter, RegistrationPatch};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_registration).get(list_registrations))
        .route("/:id", get(get_registration).patch(update_registration))
}

/// POST /registrations: the server decides `enrolled` vs `waitlisted`.
pub async fn create_registration(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<NewRegistration>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::body_rejection_to_response(e),
    };
    match services.registrations_create(body) {
        Ok(registration) => (StatusCode::CREATED, Json(registration)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /registrations?person_id=&course_id=&status=
pub async fn list_registrations(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<RegistrationFilter>, QueryRejection>,
) -> axum::response::Response {
    match query {
        Ok(Query(filter)) => {
            (StatusCode::OK, Json(services.registrations_list(&filter))).into_response()
        }
        Err(e) => errors::query_rejection_to_response(e),
    }
}

pub async fn get_registration(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RegistrationId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.registrations_get(id) {
        Ok(registration) => (StatusCode::OK, Json(registration)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// PATCH /registrations/{id}, body `{ "status": "dropped" }`.
///
/// Dropping an enrolled registration frees its seat and may promote the
/// earliest waitlisted registration of the same course.
pub async fn update_registration(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<RegistrationPatch>, JsonRejection>,
) -> axum::response::Response {
    let id: RegistrationId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let Json(patch) = match body {
        Ok(b) => b,
        Err(e) => return errors::body_rejection_to_response(e),
    };
    match services.registrations_update(id, patch) {
        Ok(update) => (StatusCode::OK, Json(update.registration)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
