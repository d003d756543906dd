//! Delivery entry point.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use taskpulse_common::error::AppError;
use taskpulse_common::types::{DeliveryReport, DeliveryRequest};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/push/send", post(send_push))
}

/// POST /api/push/send — Fan a notification out to the requested employees
/// (or everyone when `broadcast` is set).
///
/// Partial delivery failure is reported in the body, not as an HTTP error;
/// 400 means the target selection was invalid, 500 means the store was unreadable.
async fn send_push(
    State(state): State<AppState>,
    Json(request): Json<DeliveryRequest>,
) -> Result<Json<DeliveryReport>, AppError> {
    let report = state.fanout.send(&request).await?;
    Ok(Json(report))
}
