use serde::Deserialize;

/// Global application configuration loaded from environment variables.
///
/// Loaded once at process start and immutable thereafter. The VAPID key
/// pair identifies this server to browser push vendors; rotating the
/// private key invalidates every stored subscription, so treat it as a
/// long-lived deployment secret.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Maximum number of PostgreSQL connections in the pool (default: 20)
    pub db_max_connections: u32,

    /// Seconds to wait for a free pool connection before giving up
    /// (default: 5)
    pub db_acquire_timeout_secs: u64,

    /// VAPID public key, URL-safe base64. Served to browsers for
    /// `pushManager.subscribe`.
    pub vapid_public_key: String,

    /// VAPID private key, URL-safe base64 (no padding). Signs every
    /// outbound push.
    pub vapid_private_key: String,

    /// VAPID subject claim — a contact URI, e.g. `mailto:ops@example.com`
    pub vapid_subject: String,

    /// TTL in seconds the push vendor may queue an undelivered message
    /// (default: 60)
    pub push_ttl_seconds: u32,

    /// Socket address the API server binds to (default: 0.0.0.0:3000)
    pub bind_addr: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
            db_acquire_timeout_secs: std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_ACQUIRE_TIMEOUT_SECS must be a valid u64"))?,
            vapid_public_key: std::env::var("VAPID_PUBLIC_KEY").map_err(|_| {
                anyhow::anyhow!("VAPID_PUBLIC_KEY environment variable is required")
            })?,
            vapid_private_key: std::env::var("VAPID_PRIVATE_KEY").map_err(|_| {
                anyhow::anyhow!("VAPID_PRIVATE_KEY environment variable is required")
            })?,
            vapid_subject: std::env::var("VAPID_SUBJECT")
                .map_err(|_| anyhow::anyhow!("VAPID_SUBJECT environment variable is required"))?,
            push_ttl_seconds: std::env::var("PUSH_TTL_SECONDS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PUSH_TTL_SECONDS must be a valid u32"))?,
            bind_addr: std::env::var("BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        })
    }
}
