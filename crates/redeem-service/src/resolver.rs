//! Cache-aside lookup of gift code terms.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use async_trait::async_trait;
use chrono::Utc;
use redeem_core::{RedeemError, RedeemResult};
use redeem_domain::GiftCode;
use redeem_repository::GiftCodeRepository;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves the charge terms of a gift code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GiftCodeResolver: Send + Sync {
    /// Returns the terms of `code`, or `NotFound` if it is unknown or not redeemable now.
    async fn resolve(&self, code: &str) -> RedeemResult<GiftCode>;
}

/// Resolver that prefers the cache and falls back to the store.
///
/// A cache hit is returned as is. On a miss the store is queried for terms
/// active now, and the result is cached until the end of its validity window.
/// Cache failures never fail a lookup.
pub struct CacheAsideGiftCodeResolver {
    cache: Arc<dyn CacheInterface>,
    repository: Arc<dyn GiftCodeRepository>,
}

impl CacheAsideGiftCodeResolver {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>, repository: Arc<dyn GiftCodeRepository>) -> Self {
        Self { cache, repository }
    }
}

#[async_trait]
impl GiftCodeResolver for CacheAsideGiftCodeResolver {
    async fn resolve(&self, code: &str) -> RedeemResult<GiftCode> {
        let key = cache_keys::gift_code(code);

        match self.cache.get::<GiftCode>(&key).await {
            Ok(Some(cached)) if cached.is_redeemable_at(Utc::now()) => {
                debug!("Gift code {} resolved from cache", code);
                return Ok(cached);
            }
            // Backend TTLs round up to whole seconds, so an entry can outlive its window.
            Ok(Some(_)) => {
                if let Err(e) = self.cache.delete(&key).await {
                    warn!("Failed to drop lapsed gift code {}: {}", code, e);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Gift code cache read failed for {}, using store: {}", code, e),
        }

        let now = Utc::now();
        let gift_code = self
            .repository
            .find_active_by_code(code, now)
            .await?
            .ok_or_else(|| RedeemError::not_found("GiftCode", code))?;

        let ttl = gift_code.cache_ttl(Utc::now());
        if let Err(e) = self.cache.set(&key, &gift_code, ttl).await {
            warn!("Failed to cache gift code {}: {}", code, e);
        }

        debug!("Gift code {} resolved from store, cached for {:?}", code, ttl);
        Ok(gift_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;
    use crate::test_support::{gift_code_with_window, FakeGiftCodeRepository, FailingCache};
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    fn resolver(
        cache: Arc<dyn CacheInterface>,
        repo: Arc<FakeGiftCodeRepository>,
    ) -> CacheAsideGiftCodeResolver {
        CacheAsideGiftCodeResolver::new(cache, repo)
    }

    #[tokio::test]
    async fn test_miss_loads_from_store_and_caches() {
        let cache = Arc::new(InMemoryCache::new());
        let repo = Arc::new(FakeGiftCodeRepository::with_active("WELCOME10", 1000));
        let resolver = resolver(cache.clone(), repo.clone());

        let first = resolver.resolve("WELCOME10").await.unwrap();
        let second = resolver.resolve("WELCOME10").await.unwrap();

        assert_eq!(first.amount, 1000);
        assert_eq!(first, second);
        assert_eq!(repo.active_lookups(), 1, "second resolve must be served from cache");
        assert!(cache.exists("gifts:WELCOME10").await.unwrap());
    }

    #[tokio::test]
    async fn test_cached_terms_expire_with_window() {
        let cache = Arc::new(InMemoryCache::new());
        let now = Utc::now();
        let repo = Arc::new(FakeGiftCodeRepository::new(vec![gift_code_with_window(
            "SHORT",
            500,
            now - ChronoDuration::hours(1),
            now + ChronoDuration::milliseconds(1500),
        )]));
        let resolver = resolver(cache.clone(), repo.clone());

        resolver.resolve("SHORT").await.unwrap();
        assert!(cache.exists("gifts:SHORT").await.unwrap());

        tokio::time::sleep(Duration::from_millis(1700)).await;
        assert!(!cache.exists("gifts:SHORT").await.unwrap());
        assert!(resolver.resolve("SHORT").await.unwrap_err().is_not_found());
        assert_eq!(repo.active_lookups(), 2);
    }

    #[tokio::test]
    async fn test_lapsed_cache_entry_is_not_served() {
        let cache = Arc::new(InMemoryCache::new());
        let now = Utc::now();
        let lapsed = gift_code_with_window(
            "LAPSED",
            500,
            now - ChronoDuration::hours(2),
            now - ChronoDuration::seconds(1),
        );
        cache
            .set("gifts:LAPSED", &lapsed, Duration::from_secs(60))
            .await
            .unwrap();
        let repo = Arc::new(FakeGiftCodeRepository::new(vec![lapsed]));
        let resolver = resolver(cache.clone(), repo.clone());

        assert!(resolver.resolve("LAPSED").await.unwrap_err().is_not_found());
        assert_eq!(repo.active_lookups(), 1);
        assert!(!cache.exists("gifts:LAPSED").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let cache = Arc::new(InMemoryCache::new());
        let repo = Arc::new(FakeGiftCodeRepository::new(vec![]));
        let resolver = resolver(cache.clone(), repo);

        let err = resolver.resolve("NOPE").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_code_outside_window_is_not_found() {
        let now = Utc::now();
        let repo = Arc::new(FakeGiftCodeRepository::new(vec![
            gift_code_with_window(
                "EXPIRED",
                1000,
                now - ChronoDuration::hours(2),
                now - ChronoDuration::hours(1),
            ),
            gift_code_with_window(
                "FUTURE",
                1000,
                now + ChronoDuration::hours(1),
                now + ChronoDuration::hours(2),
            ),
        ]));
        let resolver = resolver(Arc::new(InMemoryCache::new()), repo);

        assert!(resolver.resolve("EXPIRED").await.unwrap_err().is_not_found());
        assert!(resolver.resolve("FUTURE").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_cache_failure_falls_back_to_store() {
        let repo = Arc::new(FakeGiftCodeRepository::with_active("WELCOME10", 1000));
        let resolver = resolver(Arc::new(FailingCache), repo.clone());

        let terms = resolver.resolve("WELCOME10").await.unwrap();
        assert_eq!(terms.amount, 1000);

        resolver.resolve("WELCOME10").await.unwrap();
        assert_eq!(repo.active_lookups(), 2);
    }
}
