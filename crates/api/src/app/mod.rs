//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: store + registration workflow wiring
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs that are not domain records
//! - `errors.rs`: consistent error responses

use std::net::IpAddr;
use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router with a fresh in-memory store.
///
/// `ip_address` is the address reported by the health endpoints.
pub fn build_app(ip_address: IpAddr) -> Router {
    build_app_with(Arc::new(services::AppServices::in_memory()), ip_address)
}

/// Build the router around existing services (shared state in tests).
pub fn build_app_with(services: Arc<services::AppServices>, ip_address: IpAddr) -> Router {
    let logging = axum::middleware::from_fn(middleware::request_logging);
    routes::router()
        .layer(Extension(services))
        .layer(Extension(dto::ServerInfo { ip_address }))
        .layer(ServiceBuilder::new().layer(logging))
}
