use std::sync::Arc;

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use campus_core::PersonId;
use campus_people::{NewPerson, PersonFilter, PersonPatch};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_person).get(list_persons))
        .route("/:id", get(get_person).patch(update_person))
}

pub async fn create_person(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<NewPerson>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::body_rejection_to_response(e),
    };
    match services.persons_create(body) {
        Ok(person) => (StatusCode::CREATED, Json(person)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /persons?uni=&first_name=&last_name=&email=&phone=&birth_date=&city=&country=
pub async fn list_persons(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<PersonFilter>, QueryRejection>,
) -> axum::response::Response {
    match query {
        Ok(Query(filter)) => {
            (StatusCode::OK, Json(services.persons_list(&filter))).into_response()
        }
        Err(e) => errors::query_rejection_to_response(e),
    }
}

pub async fn get_person(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PersonId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.persons_get(id) {
        Some(person) => (StatusCode::OK, Json(person)).into_response(),
        None => errors::not_found("person"),
    }
}

pub async fn update_person(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<PersonPatch>, JsonRejection>,
) -> axum::response::Response {
    let id: PersonId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let Json(patch) = match body {
        Ok(b) => b,
        Err(e) => return errors::body_rejection_to_response(e),
    };
    match services.persons_update(id, patch) {
        Ok(person) => (StatusCode::OK, Json(person)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
