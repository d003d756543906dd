//! Subscription lifecycle routes.

use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use taskpulse_common::error::AppError;
use taskpulse_common::types::{PushSubscription, SubscriptionKeys};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/push/subscriptions", post(subscribe))
        .route("/api/push/subscriptions", delete(unsubscribe))
        .route(
            "/api/push/subscriptions/{employee_id}",
            get(list_subscriptions),
        )
        .route("/api/push/vapid-public-key", get(vapid_public_key))
}

/// Body of a registration call — what the browser's `pushManager.subscribe`
/// returned, plus the owning employee.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub employee_id: Uuid,
    pub endpoint: String,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeRequest {
    pub employee_id: Uuid,
    pub endpoint: String,
}

/// POST /api/push/subscriptions — Register (or rekey) a device.
async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Json<PushSubscription>, AppError> {
    let subscription = state
        .store
        .upsert(
            request.employee_id,
            &request.endpoint,
            &request.keys.p256dh,
            &request.keys.auth,
        )
        .await?;
    Ok(Json(subscription))
}

/// DELETE /api/push/subscriptions — Explicit unsubscribe of one device.
async fn unsubscribe(
    State(state): State<AppState>,
    Json(request): Json<UnsubscribeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state
        .store
        .delete_by_endpoint(request.employee_id, &request.endpoint)
        .await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

/// GET /api/push/subscriptions/:employee_id — List an employee's devices.
async fn list_subscriptions(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<Vec<PushSubscription>>, AppError> {
    let subscriptions = state.store.list_by_employee(employee_id).await?;
    Ok(Json(subscriptions))
}

/// GET /api/push/vapid-public-key — The application server key browsers
/// pass to `pushManager.subscribe`.
async fn vapid_public_key(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "publicKey": state.config.vapid_public_key }))
}
