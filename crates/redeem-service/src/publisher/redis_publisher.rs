//! Redis pub/sub event publisher.

use async_trait::async_trait;
use deadpool_redis::Pool;
use redeem_core::{EventPublisher, HealthCheck, HealthStatus, RedeemError, RedeemResult};
use std::sync::Arc;
use tracing::debug;

/// Publishes events with `PUBLISH {prefix}{subject} payload`.
pub struct RedisEventPublisher {
    pool: Arc<Pool>,
    channel_prefix: String,
}

impl RedisEventPublisher {
    #[must_use]
    pub fn new(pool: Arc<Pool>, channel_prefix: impl Into<String>) -> Self {
        Self {
            pool,
            channel_prefix: channel_prefix.into(),
        }
    }

    /// Channel a subject is published on.
    #[must_use]
    pub fn channel(&self, subject: &str) -> String {
        format!("{}{}", self.channel_prefix, subject)
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, subject: &str, payload: &[u8]) -> RedeemResult<()> {
        let channel = self.channel(subject);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| RedeemError::publish(subject, format!("no Redis connection: {}", e)))?;

        let receivers: i64 = deadpool_redis::redis::cmd("PUBLISH")
            .arg(&channel)
            .arg(payload)
            .query_async(&mut conn)
            .await
            .map_err(|e| RedeemError::publish(subject, e.to_string()))?;

        debug!(
            "Published {} bytes on '{}' to {} subscribers",
            payload.len(),
            channel,
            receivers
        );
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for RedisEventPublisher {
    fn name(&self) -> &str {
        "event-channel"
    }

    async fn check(&self) -> HealthStatus {
        match self.pool.get().await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}
