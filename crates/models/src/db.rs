use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

/// Open the shared connection pool from validated config.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    Ok(db)
}

/// Startup-only readiness wait: poll the database with bounded attempts and
/// a fixed delay. Every other operation in the service fails fast.
pub async fn connect_with_retry(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut last_err = None;
    for attempt in 1..=cfg.boot_retries {
        match connect(cfg).await {
            Ok(db) => match db.ping().await {
                Ok(()) => {
                    info!(attempt, "database reachable");
                    return Ok(db);
                }
                Err(e) => last_err = Some(anyhow::Error::from(e)),
            },
            Err(e) => last_err = Some(e),
        }
        if attempt < cfg.boot_retries {
            warn!(
                attempt,
                retries = cfg.boot_retries,
                delay_secs = cfg.boot_retry_delay_secs,
                "database not reachable yet, retrying"
            );
            tokio::time::sleep(Duration::from_secs(cfg.boot_retry_delay_secs)).await;
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("database unreachable")))
}
