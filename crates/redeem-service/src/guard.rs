//! In-flight redemption guard.
//!
//! A TTL-bounded marker in the shared cache that lets at most one attempt per
//! `(mobile, gift_code)` pass at a time. It is released at the end of every
//! attempt, so it only rejects overlapping requests; the durable usage report
//! is what rejects repeated ones.
//!
//! Every marker names the attempt that wrote it, so an attempt that lost the
//! reply to its own acquire can free the key without touching a key held by
//! someone else.

use crate::cache::{cache_keys, CacheInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redeem_core::RedeemResult;
use redeem_domain::RedemptionKey;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Default lifetime of a guard entry.
pub const DEFAULT_GUARD_TTL: Duration = Duration::from_secs(3600);

/// Mutual exclusion for redemption attempts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedemptionGuard: Send + Sync {
    /// Creates the guard entry for `attempt` if absent. Returns `false` if another attempt holds it.
    async fn acquire(&self, key: &RedemptionKey, attempt: Uuid) -> RedeemResult<bool>;

    /// Rewrites the marker to note that the request was recorded.
    async fn record(&self, key: &RedemptionKey, attempt: Uuid) -> RedeemResult<()>;

    /// Deletes the guard entry. A missing entry is not an error.
    async fn release(&self, key: &RedemptionKey) -> RedeemResult<()>;

    /// Deletes the guard entry only if `attempt` wrote it. Returns whether it was deleted.
    async fn release_if_owned(&self, key: &RedemptionKey, attempt: Uuid) -> RedeemResult<bool>;
}

/// Marker stored under the guard key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardMarker {
    pub attempt_id: Uuid,
    pub mobile: String,
    pub gift_code: String,
    pub requested_at: DateTime<Utc>,
}

impl GuardMarker {
    fn for_attempt(key: &RedemptionKey, attempt: Uuid) -> Self {
        Self {
            attempt_id: attempt,
            mobile: key.mobile.clone(),
            gift_code: key.gift_code.clone(),
            requested_at: Utc::now(),
        }
    }
}

/// Guard backed by any [`CacheInterface`] through its set-if-absent primitive.
pub struct CacheRedemptionGuard {
    cache: Arc<dyn CacheInterface>,
    ttl: Duration,
}

impl CacheRedemptionGuard {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }
}

#[async_trait]
impl RedemptionGuard for CacheRedemptionGuard {
    async fn acquire(&self, key: &RedemptionKey, attempt: Uuid) -> RedeemResult<bool> {
        let marker = serde_json::to_string(&GuardMarker::for_attempt(key, attempt))?;
        let acquired = self
            .cache
            .set_if_absent(
                &cache_keys::redemption_guard(&key.mobile, &key.gift_code),
                &marker,
                self.ttl,
            )
            .await?;

        debug!("Guard acquire for {}: {}", key, acquired);
        Ok(acquired)
    }

    async fn record(&self, key: &RedemptionKey, attempt: Uuid) -> RedeemResult<()> {
        let marker = serde_json::to_string(&GuardMarker::for_attempt(key, attempt))?;
        self.cache
            .set_raw(
                &cache_keys::redemption_guard(&key.mobile, &key.gift_code),
                &marker,
                self.ttl,
            )
            .await
    }

    async fn release(&self, key: &RedemptionKey) -> RedeemResult<()> {
        let existed = self
            .cache
            .delete(&cache_keys::redemption_guard(&key.mobile, &key.gift_code))
            .await?;

        debug!("Guard released for {} (existed: {})", key, existed);
        Ok(())
    }

    async fn release_if_owned(&self, key: &RedemptionKey, attempt: Uuid) -> RedeemResult<bool> {
        let cache_key = cache_keys::redemption_guard(&key.mobile, &key.gift_code);
        let owner = self
            .cache
            .get_raw(&cache_key)
            .await?
            .and_then(|raw| serde_json::from_str::<GuardMarker>(&raw).ok())
            .map(|marker| marker.attempt_id);

        if owner != Some(attempt) {
            debug!("Guard for {} not held by attempt {}", key, attempt);
            return Ok(false);
        }

        // Nobody else can write the key while it exists, so the marker read
        // above is still the stored one.
        self.cache.delete(&cache_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheExt, InMemoryCache};

    fn guard() -> (Arc<InMemoryCache>, CacheRedemptionGuard) {
        let cache = Arc::new(InMemoryCache::new());
        let guard = CacheRedemptionGuard::new(cache.clone(), DEFAULT_GUARD_TTL);
        (cache, guard)
    }

    #[tokio::test]
    async fn test_acquire_writes_marker() {
        let (cache, guard) = guard();
        let key = RedemptionKey::new("+1555", "WELCOME10");
        let attempt = Uuid::new_v4();

        assert!(guard.acquire(&key, attempt).await.unwrap());

        let marker: GuardMarker = cache
            .get("discounts:+1555:WELCOME10")
            .await
            .unwrap()
            .expect("marker stored");
        assert_eq!(marker.attempt_id, attempt);
        assert_eq!(marker.mobile, "+1555");
        assert_eq!(marker.gift_code, "WELCOME10");
    }

    #[tokio::test]
    async fn test_release_if_owned_frees_only_own_marker() {
        let (cache, guard) = guard();
        let key = RedemptionKey::new("+1555", "WELCOME10");
        let holder = Uuid::new_v4();

        assert!(guard.acquire(&key, holder).await.unwrap());
        assert!(!guard.release_if_owned(&key, Uuid::new_v4()).await.unwrap());
        assert!(cache.exists("discounts:+1555:WELCOME10").await.unwrap());

        assert!(guard.release_if_owned(&key, holder).await.unwrap());
        assert!(!cache.exists("discounts:+1555:WELCOME10").await.unwrap());
    }

    #[tokio::test]
    async fn test_release_if_owned_without_marker_is_noop() {
        let (cache, guard) = guard();
        let key = RedemptionKey::new("+1555", "WELCOME10");
        assert!(!guard.release_if_owned(&key, Uuid::new_v4()).await.unwrap());

        cache
            .set_raw("discounts:+1555:WELCOME10", "not json", DEFAULT_GUARD_TTL)
            .await
            .unwrap();
        assert!(!guard.release_if_owned(&key, Uuid::new_v4()).await.unwrap());
        assert!(cache.exists("discounts:+1555:WELCOME10").await.unwrap());
    }

    #[tokio::test]
    async fn test_second_acquire_fails_until_release() {
        let (_cache, guard) = guard();
        let key = RedemptionKey::new("+1555", "WELCOME10");

        assert!(guard.acquire(&key, Uuid::new_v4()).await.unwrap());
        assert!(!guard.acquire(&key, Uuid::new_v4()).await.unwrap());

        guard.release(&key).await.unwrap();
        assert!(guard.acquire(&key, Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let (_cache, guard) = guard();

        let attempt = Uuid::new_v4();
        assert!(guard.acquire(&RedemptionKey::new("+1555", "A"), attempt).await.unwrap());
        assert!(guard.acquire(&RedemptionKey::new("+1555", "B"), attempt).await.unwrap());
        assert!(guard.acquire(&RedemptionKey::new("+1666", "A"), attempt).await.unwrap());
    }

    #[tokio::test]
    async fn test_release_missing_key_is_ok() {
        let (_cache, guard) = guard();
        guard
            .release(&RedemptionKey::new("+1555", "WELCOME10"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_record_keeps_guard_held() {
        let (cache, guard) = guard();
        let key = RedemptionKey::new("+1555", "WELCOME10");

        let attempt = Uuid::new_v4();
        guard.acquire(&key, attempt).await.unwrap();
        guard.record(&key, attempt).await.unwrap();

        assert!(cache.exists("discounts:+1555:WELCOME10").await.unwrap());
        assert!(!guard.acquire(&key, Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_acquire_exactly_one_succeeds() {
        let (_cache, guard) = guard();
        let guard = Arc::new(guard);
        let key = RedemptionKey::new("+1555", "WELCOME10");

        let (a, b) = tokio::join!(
            {
                let guard = guard.clone();
                let key = key.clone();
                async move { guard.acquire(&key, Uuid::new_v4()).await.unwrap() }
            },
            {
                let guard = guard.clone();
                let key = key.clone();
                async move { guard.acquire(&key, Uuid::new_v4()).await.unwrap() }
            }
        );

        assert!(a ^ b, "exactly one acquire must succeed");
    }
}
