use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    Json,
};

use crate::app::dto::{Health, HealthQuery, ServerInfo};

pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to the campus registry API.",
        "resources": ["/persons", "/addresses", "/courses", "/registrations"],
    }))
}

pub async fn health(
    Extension(info): Extension<ServerInfo>,
    Query(query): Query<HealthQuery>,
) -> Json<Health> {
    Json(Health::ok(info.ip_address, query.echo, None))
}

pub async fn health_with_path(
    Extension(info): Extension<ServerInfo>,
    Path(path_echo): Path<String>,
    Query(query): Query<HealthQuery>,
) -> Json<Health> {
    Json(Health::ok(info.ip_address, query.echo, Some(path_echo)))
}
