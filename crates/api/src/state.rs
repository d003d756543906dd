//! Shared application state for the Axum API server.

use std::sync::Arc;

use taskpulse_common::config::AppConfig;
use taskpulse_push::fanout::PushFanout;
use taskpulse_push::store::SubscriptionStore;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubscriptionStore>,
    pub fanout: Arc<PushFanout>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn SubscriptionStore>, fanout: Arc<PushFanout>, config: AppConfig) -> Self {
        Self {
            store,
            fanout,
            config,
        }
    }
}
