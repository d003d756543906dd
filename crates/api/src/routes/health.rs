//! Liveness endpoint for deploy probes and the frontend's connectivity check.

use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health — static liveness answer; does not touch the store, so a
/// degraded database never makes the probe flap.
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "taskpulse-push-api",
        "version": env!("CARGO_PKG_VERSION"),
        "time": Utc::now().to_rfc3339(),
    }))
}
