use axum::{routing::get, Router};

pub mod addresses;
pub mod admin;
pub mod courses;
pub mod persons;
pub mod registrations;
pub mod system;

/// Router for every resource endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/health/:path_echo", get(system::health_with_path))
        .nest("/persons", persons::router())
        .nest("/addresses", addresses::router())
        .nest("/courses", courses::router())
        .nest("/registrations", registrations::router())
        .nest("/admin", admin::router())
}
