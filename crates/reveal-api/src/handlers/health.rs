//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use reveal_core::AtomicKv;
use serde_json::{json, Value};

use crate::state::AppState;

/// Liveness check
///
/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness check: verifies the backing store answers
///
/// GET /health/ready
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    match state.context().kv().ping().await {
        Ok(()) => Ok(Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
