//! Per-endpoint push delivery.
//!
//! The worker performs the encrypted Web Push handshake for a single
//! subscription and classifies the outcome. It never touches the
//! subscription store — eviction of dead endpoints is the orchestrator's
//! call to make.

use async_trait::async_trait;
use thiserror::Error;
use web_push::{
    ContentEncoding, IsahcWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessageBuilder,
};

use taskpulse_common::config::AppConfig;
use taskpulse_common::types::PushSubscription;

/// Classified outcome of a failed delivery attempt.
///
/// The orchestrator switches on this tag directly; no status-code strings
/// are inspected anywhere downstream.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// Endpoint permanently invalid (404/410 class). Evict, never retry.
    #[error("subscription endpoint is gone")]
    Gone,

    /// Rate limit or push-vendor fault (429/5xx class). Retry once.
    #[error("transient delivery failure: {0}")]
    Transient(String),

    /// Anything else (malformed keys, oversized payload, …). Report only.
    #[error("delivery failed: {0}")]
    Permanent(String),
}

/// Delivers one encoded payload to one subscription.
#[async_trait]
pub trait DeliveryWorker: Send + Sync {
    async fn deliver(
        &self,
        subscription: &PushSubscription,
        payload: &[u8],
    ) -> Result<(), DeliveryError>;
}

/// Production worker speaking the Web Push protocol, authenticated via the
/// process-wide VAPID identity.
pub struct WebPushWorker {
    client: IsahcWebPushClient,
    vapid_private_key: String,
    vapid_subject: String,
    ttl_seconds: u32,
}

impl WebPushWorker {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: IsahcWebPushClient::new()?,
            vapid_private_key: config.vapid_private_key.clone(),
            vapid_subject: config.vapid_subject.clone(),
            ttl_seconds: config.push_ttl_seconds,
        })
    }

    /// Map the transport-level error onto the retry/eviction taxonomy.
    ///
    /// Rate limiting (HTTP 429) has no dedicated variant — it arrives as a
    /// generic response error carrying the status code, so it is matched on
    /// the structured `code` field.
    fn classify(err: WebPushError) -> DeliveryError {
        match err {
            WebPushError::EndpointNotValid(_) | WebPushError::EndpointNotFound(_) => {
                DeliveryError::Gone
            }
            WebPushError::ServerError { .. } => DeliveryError::Transient(err.to_string()),
            WebPushError::Other(ref info) if info.code == 429 => {
                DeliveryError::Transient(err.to_string())
            }
            other => DeliveryError::Permanent(other.to_string()),
        }
    }
}

#[async_trait]
impl DeliveryWorker for WebPushWorker {
    async fn deliver(
        &self,
        subscription: &PushSubscription,
        payload: &[u8],
    ) -> Result<(), DeliveryError> {
        let info = SubscriptionInfo::new(
            subscription.endpoint.clone(),
            subscription.p256dh.clone(),
            subscription.auth.clone(),
        );

        let mut signature = VapidSignatureBuilder::from_base64(&self.vapid_private_key, &info)
            .map_err(Self::classify)?;
        signature.add_claim("sub", self.vapid_subject.clone());
        let signature = signature.build().map_err(Self::classify)?;

        let mut message = WebPushMessageBuilder::new(&info);
        message.set_payload(ContentEncoding::Aes128Gcm, payload);
        message.set_vapid_signature(signature);
        message.set_ttl(self.ttl_seconds);

        let message = message.build().map_err(Self::classify)?;
        self.client.send(message).await.map_err(Self::classify)
    }
}
