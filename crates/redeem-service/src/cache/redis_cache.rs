//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use redeem_core::{HealthCheck, HealthStatus, RedeemError, RedeemResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Redis-based cache service.
pub struct RedisCacheService {
    /// Redis connection pool.
    pool: Arc<Pool>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> RedeemResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| RedeemError::Cache(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    async fn get_raw(&self, key: &str) -> RedeemResult<Option<String>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| {
            RedeemError::Cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RedeemResult<()> {
        // Sub-second remainders round up so a live entry never gets EX 0.
        let ttl_secs = ttl.as_millis().div_ceil(1000) as u64;
        if ttl_secs == 0 {
            debug!("Skipping cache write for key '{}' with zero TTL", key);
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await.map_err(|e| {
            RedeemError::Cache(format!("Failed to set key '{}': {}", key, e))
        })?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> RedeemResult<bool> {
        let ttl_secs = ttl.as_secs().max(1);
        let mut conn = self.get_conn().await?;

        let reply: Option<String> = deadpool_redis::redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(|e| RedeemError::Cache(format!("Failed to set key '{}' NX: {}", key, e)))?;

        let created = reply.is_some();
        debug!("SET NX key '{}': created={}", key, created);
        Ok(created)
    }

    async fn delete(&self, key: &str) -> RedeemResult<bool> {
        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(|e| {
            RedeemError::Cache(format!("Failed to delete key '{}': {}", key, e))
        })?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> RedeemResult<bool> {
        let mut conn = self.get_conn().await?;
        let exists: bool = conn.exists(key).await.map_err(|e| {
            RedeemError::Cache(format!("Failed to check key '{}': {}", key, e))
        })?;

        Ok(exists)
    }
}

#[async_trait]
impl HealthCheck for RedisCacheService {
    fn name(&self) -> &str {
        "redis"
    }

    async fn check(&self) -> HealthStatus {
        let mut conn = match self.get_conn().await {
            Ok(conn) => conn,
            Err(e) => return HealthStatus::Unhealthy(e.to_string()),
        };

        let pong: Result<String, _> = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await;
        match pong {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(format!("PING failed: {}", e)),
        }
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisCacheService")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}
