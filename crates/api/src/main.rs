//! TaskPulse push API server binary entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use taskpulse_common::config::AppConfig;
use taskpulse_common::db::create_pool;
use taskpulse_push::fanout::PushFanout;
use taskpulse_push::store::PgSubscriptionStore;
use taskpulse_push::worker::WebPushWorker;

use taskpulse_api::routes::create_router;
use taskpulse_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("taskpulse_api=debug,taskpulse_push=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting TaskPulse push API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Create database connection pool and apply pending migrations
    let pool = create_pool(&config).await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database pool created, migrations applied");

    // Wire the delivery pipeline
    let store = Arc::new(PgSubscriptionStore::new(pool));
    let worker = Arc::new(WebPushWorker::new(&config)?);
    let fanout = Arc::new(PushFanout::new(store.clone(), worker));

    // Build application state
    let state = AppState::new(store, fanout, config.clone());

    // Build router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
