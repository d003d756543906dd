use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered browser push endpoint for one employee's device.
///
/// One employee may hold several subscriptions (one per browser/device);
/// the pair `(employee_id, endpoint)` is unique — re-subscribing the same
/// device rekeys the existing row instead of inserting a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PushSubscription {
    pub id: Uuid,
    pub employee_id: Uuid,
    /// Vendor-specific opaque URL identifying the device registration.
    pub endpoint: String,
    /// Client public key for aes128gcm payload encryption.
    pub p256dh: String,
    /// Client auth secret for aes128gcm payload encryption.
    pub auth: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The encryption key pair a browser hands out on `pushManager.subscribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// One logical send submitted by a caller: either a target list of
/// employees or a broadcast to every current subscription.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRequest {
    /// Target employees. Required (non-empty) unless `broadcast` is set.
    pub employee_ids: Option<Vec<Uuid>>,
    /// When true, deliver to every stored subscription.
    #[serde(default)]
    pub broadcast: bool,
    pub title: Option<String>,
    pub body: Option<String>,
    /// Arbitrary metadata forwarded to the service worker (e.g. a target URL).
    pub data: Option<serde_json::Value>,
}

/// Final outcome of delivery to one subscription.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub employee_id: Uuid,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate report for one delivery request.
///
/// Partial failure is a normal, reportable outcome — `sent < total` never
/// fails the request itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReport {
    pub message: String,
    pub sent: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<DeliveryResult>>,
}

impl DeliveryReport {
    /// Report for a request that resolved zero subscriptions. Not an error:
    /// the targeted employees simply have not opted in yet.
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sent: 0,
            total: 0,
            results: None,
        }
    }
}
