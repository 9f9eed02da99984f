//! Cache (redis) client.
//!
//! The reconnect policy lives here and only here: the first use establishes
//! the connection lazily, and `ConnectionManager` re-establishes it
//! transparently when it drops. Call sites never check connection state.

use std::sync::Arc;

use configs::CacheConfig;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::OnceCell;

use crate::errors::ServiceError;

#[derive(Clone)]
pub struct CacheClient {
    client: redis::Client,
    manager: Arc<OnceCell<ConnectionManager>>,
}

impl CacheClient {
    /// Construct the client. No connection is opened yet; a cache that is
    /// down at boot only degrades readiness, it does not stop the process.
    pub fn new(cfg: &CacheConfig) -> Result<Self, ServiceError> {
        let client = redis::Client::open(cfg.url())
            .map_err(|e| ServiceError::Unavailable(format!("invalid redis config: {e}")))?;
        Ok(Self { client, manager: Arc::new(OnceCell::new()) })
    }

    async fn conn(&self) -> Result<ConnectionManager, ServiceError> {
        let manager = self
            .manager
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await
            .map_err(|e| ServiceError::Unavailable(format!("redis connect failed: {e}")))?;
        Ok(manager.clone())
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        let mut conn = self.conn().await?;
        let _: () = conn
            .set(key, value)
            .await
            .map_err(|e| ServiceError::Unavailable(format!("redis SET failed: {e}")))?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let mut conn = self.conn().await?;
        conn.get(key)
            .await
            .map_err(|e| ServiceError::Unavailable(format!("redis GET failed: {e}")))
    }

    /// Ok(false) when the key did not exist.
    pub async fn delete(&self, key: &str) -> Result<bool, ServiceError> {
        let mut conn = self.conn().await?;
        let removed: i64 = conn
            .del(key)
            .await
            .map_err(|e| ServiceError::Unavailable(format!("redis DEL failed: {e}")))?;
        Ok(removed > 0)
    }

    /// Liveness probe; never propagates errors.
    pub async fn probe(&self) -> bool {
        let Ok(mut conn) = self.conn().await else {
            return false;
        };
        let pong: Result<String, redis::RedisError> =
            redis::cmd("PING").query_async(&mut conn).await;
        match pong {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(store = "redis", error = %e, "cache probe failed");
                false
            }
        }
    }
}
