use std::sync::Arc;

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use campus_core::AddressId;
use campus_people::{AddressFilter, AddressPatch, NewAddress};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_address).get(list_addresses))
        .route("/:id", get(get_address).patch(update_address))
}

/// POST /addresses: a client-chosen `id` that is already taken yields 409.
pub async fn create_address(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<NewAddress>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::body_rejection_to_response(e),
    };
    match services.addresses_create(body) {
        Ok(address) => (StatusCode::CREATED, Json(address)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_addresses(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<AddressFilter>, QueryRejection>,
) -> axum::response::Response {
    match query {
        Ok(Query(filter)) => {
            (StatusCode::OK, Json(services.addresses_list(&filter))).into_response()
        }
        Err(e) => errors::query_rejection_to_response(e),
    }
}

pub async fn get_address(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: AddressId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.addresses_get(id) {
        Some(address) => (StatusCode::OK, Json(address)).into_response(),
        None => errors::not_found("address"),
    }
}

pub async fn update_address(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<AddressPatch>, JsonRejection>,
) -> axum::response::Response {
    let id: AddressId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let Json(patch) = match body {
        Ok(b) => b,
        Err(e) => return errors::body_rejection_to_response(e),
    };
    match services.addresses_update(id, patch) {
        Ok(address) => (StatusCode::OK, Json(address)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
