//! Operator endpoints for the course seat ledger.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use campus_core::CourseId;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/enrollment-audit", get(enrollment_audit))
        .route("/courses/:id/reconcile", post(reconcile_course))
}

/// GET /admin/enrollment-audit
///
/// Recounts enrolled registrations per course and compares with the cached
/// `enrollment` value.
pub async fn enrollment_audit(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.enrollment_audit() {
        Ok(audits) => {
            let drifted = audits.iter().filter(|a| !a.is_consistent()).count();
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "courses": audits,
                    "drifted": drifted,
                })),
            )
                .into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// POST /admin/courses/{id}/reconcile
///
/// Overwrites the cached enrollment with the recount; returns the pre-repair audit.
pub async fn reconcile_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CourseId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.enrollment_reconcile(id) {
        Ok(audit) => (StatusCode::OK, Json(audit)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
