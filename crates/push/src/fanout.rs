//! Fan-out orchestrator.
//!
//! Drives one delivery request end to end: resolve targets, dedupe by
//! endpoint, encode the payload once, deliver in sequential windows of
//! bounded concurrency, retry transient failures once, evict dead
//! endpoints, aggregate the report.
//!
//! Partial failure never fails the call — only a malformed request or a
//! store read failure does.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use taskpulse_common::error::AppError;
use taskpulse_common::types::{DeliveryReport, DeliveryRequest, DeliveryResult, PushSubscription};

use crate::payload::NotificationPayload;
use crate::store::SubscriptionStore;
use crate::worker::{DeliveryError, DeliveryWorker};

/// Maximum deliveries in flight at once. Windows are processed strictly
/// sequentially, so this bounds total concurrent handshakes regardless of
/// batch size. Tunable.
pub const FANOUT_WINDOW: usize = 25;

/// Fixed delay before the single retry of a transient failure. Tunable.
pub const TRANSIENT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Orchestrates delivery of one request to many subscriptions.
pub struct PushFanout {
    store: Arc<dyn SubscriptionStore>,
    worker: Arc<dyn DeliveryWorker>,
}

impl PushFanout {
    pub fn new(store: Arc<dyn SubscriptionStore>, worker: Arc<dyn DeliveryWorker>) -> Self {
        Self { store, worker }
    }

    /// Deliver one request and return the aggregate report.
    ///
    /// Errors only on a malformed target selection or a store read failure;
    /// per-subscription delivery failures are contained in the report.
    pub async fn send(&self, request: &DeliveryRequest) -> Result<DeliveryReport, AppError> {
        let subscriptions = self.resolve_targets(request).await?;

        if subscriptions.is_empty() {
            return Ok(DeliveryReport::empty(
                "No push subscriptions registered for the requested recipients",
            ));
        }

        let subscriptions = dedupe_by_endpoint(subscriptions);
        let payload = NotificationPayload {
            title: request.title.clone(),
            body: request.body.clone(),
            data: request.data.clone(),
            ..Default::default()
        }
        .encode();

        let total = subscriptions.len();
        let mut results: Vec<DeliveryResult> = Vec::with_capacity(total);
        let mut evictions: Vec<JoinHandle<()>> = Vec::new();

        for window in subscriptions.chunks(FANOUT_WINDOW) {
            let outcomes = futures::future::join_all(
                window.iter().map(|sub| self.deliver_with_retry(sub, &payload)),
            )
            .await;

            for (sub, outcome) in window.iter().zip(outcomes) {
                match outcome {
                    Ok(()) => results.push(DeliveryResult {
                        employee_id: sub.employee_id,
                        success: true,
                        error: None,
                    }),
                    Err(err) => {
                        if matches!(err, DeliveryError::Gone) {
                            evictions.push(self.spawn_eviction(sub));
                        }
                        results.push(DeliveryResult {
                            employee_id: sub.employee_id,
                            success: false,
                            error: Some(err.to_string()),
                        });
                    }
                }
            }
        }

        // Evictions never block a window; settle them before reporting so
        // callers observe a consistent store.
        for handle in evictions {
            let _ = handle.await;
        }

        let sent = results.iter().filter(|r| r.success).count();
        tracing::info!(sent, total, "Push fan-out complete");

        Ok(DeliveryReport {
            message: format!("Sent {} of {} push notifications", sent, total),
            sent,
            total,
            results: Some(results),
        })
    }

    async fn resolve_targets(
        &self,
        request: &DeliveryRequest,
    ) -> Result<Vec<PushSubscription>, AppError> {
        if request.broadcast {
            return self.store.list_all().await;
        }

        match request.employee_ids.as_deref() {
            Some(ids) if !ids.is_empty() => self.store.list_by_employees(ids).await,
            _ => Err(AppError::Validation(
                "employeeIds must be a non-empty list unless broadcast is set".to_string(),
            )),
        }
    }

    /// One delivery attempt, plus exactly one retry after a fixed delay when
    /// the failure is transient. The retry's outcome is final.
    async fn deliver_with_retry(
        &self,
        subscription: &PushSubscription,
        payload: &[u8],
    ) -> Result<(), DeliveryError> {
        match self.worker.deliver(subscription, payload).await {
            Err(DeliveryError::Transient(reason)) => {
                tracing::debug!(
                    employee_id = %subscription.employee_id,
                    %reason,
                    "Transient push failure, retrying once"
                );
                tokio::time::sleep(TRANSIENT_RETRY_DELAY).await;
                self.worker.deliver(subscription, payload).await
            }
            outcome => outcome,
        }
    }

    fn spawn_eviction(&self, subscription: &PushSubscription) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let id = subscription.id;
        let employee_id = subscription.employee_id;

        tokio::spawn(async move {
            match store.delete_by_id(id).await {
                Ok(()) => tracing::info!(
                    subscription_id = %id,
                    employee_id = %employee_id,
                    "Evicted dead push subscription"
                ),
                Err(err) => tracing::warn!(
                    subscription_id = %id,
                    error = %err,
                    "Failed to evict dead push subscription"
                ),
            }
        })
    }
}

/// Keep the first subscription seen per endpoint. Stale duplicates can
/// appear when a device re-registers under a second employee session; one
/// physical device must receive at most one copy per request.
fn dedupe_by_endpoint(subscriptions: Vec<PushSubscription>) -> Vec<PushSubscription> {
    let before = subscriptions.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(before);
    let deduped: Vec<PushSubscription> = subscriptions
        .into_iter()
        .filter(|sub| seen.insert(sub.endpoint.clone()))
        .collect();

    if deduped.len() < before {
        tracing::debug!(
            dropped = before - deduped.len(),
            "Dropped duplicate endpoints from delivery pass"
        );
    }

    deduped
}
