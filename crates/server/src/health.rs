use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub checked_at: String,
}

pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

// No dependencies to probe: conversation state is in-memory and the
// generation API is only contacted per turn, so readiness is process-up.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "parley-server runtime initialized".to_string(),
        },
        checked_at: Utc::now().to_rfc3339(),
    })
}
