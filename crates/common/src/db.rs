use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use crate::config::AppConfig;

/// Open the subscription database pool described by the configuration.
///
/// Pool sizing and the acquire timeout come from `DB_MAX_CONNECTIONS` and
/// `DB_ACQUIRE_TIMEOUT_SECS`. A fan-out holds a connection only for the
/// initial subscription read and per-eviction deletes, so the pool stays
/// small relative to the delivery window.
pub async fn create_pool(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect(&config.database_url)
        .await?;

    tracing::info!(
        max_connections = config.db_max_connections,
        acquire_timeout_secs = config.db_acquire_timeout_secs,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}
