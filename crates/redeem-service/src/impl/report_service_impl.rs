//! Usage report service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::CreateReportRequest;
use crate::report_service::ReportService;
use async_trait::async_trait;
use redeem_core::{EventPublisher, RedeemResult, ValidateExt};
use redeem_domain::{NewUsageReport, RedemptionKey, ReportCreated, UsageCount, UsageReport};
use redeem_repository::UsageReportRepository;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Report service with cache-aside report sets and counts.
pub struct ReportServiceImpl {
    repository: Arc<dyn UsageReportRepository>,
    publisher: Arc<dyn EventPublisher>,
    cache: Arc<dyn CacheInterface>,
    ttl: Duration,
}

impl ReportServiceImpl {
    /// Creates a new report service caching reads for `ttl`.
    pub fn new(
        repository: Arc<dyn UsageReportRepository>,
        publisher: Arc<dyn EventPublisher>,
        cache: Arc<dyn CacheInterface>,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            publisher,
            cache,
            ttl,
        }
    }

    async fn cached<T, F>(&self, key: String, load: F) -> RedeemResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: Future<Output = RedeemResult<T>> + Send,
    {
        match self.cache.get::<T>(&key).await {
            Ok(Some(hit)) => return Ok(hit),
            Ok(None) => {}
            Err(e) => warn!("Report cache read failed for '{}': {}", key, e),
        }

        let value = load.await?;
        if let Err(e) = self.cache.set(&key, &value, self.ttl).await {
            warn!("Failed to cache '{}': {}", key, e);
        }
        Ok(value)
    }

    async fn invalidate(&self, key: &RedemptionKey) {
        for cache_key in [
            cache_keys::reports_by_gift_code(&key.gift_code),
            cache_keys::reports_by_mobile(&key.mobile),
            cache_keys::usage_count(&key.gift_code),
        ] {
            if let Err(e) = self.cache.delete(&cache_key).await {
                warn!("Failed to invalidate '{}': {}", cache_key, e);
            }
        }
    }
}

#[async_trait]
impl ReportService for ReportServiceImpl {
    async fn create(&self, request: CreateReportRequest) -> RedeemResult<UsageReport> {
        request.validate_request()?;

        let key = RedemptionKey::new(request.mobile, request.gift_code);
        let report = self
            .repository
            .create(&NewUsageReport::now(&key, request.charge_amount))
            .await?;
        info!("Usage report created: {} for {}", report.id, key);

        self.invalidate(&key).await;
        self.publisher
            .publish_event(&ReportCreated::new(report.clone()))
            .await?;

        Ok(report)
    }

    async fn by_gift_code(&self, gift_code: &str) -> RedeemResult<Vec<UsageReport>> {
        debug!("Listing reports for gift code {}", gift_code);
        self.cached(
            cache_keys::reports_by_gift_code(gift_code),
            self.repository.find_by_gift_code(gift_code),
        )
        .await
    }

    async fn by_mobile(&self, mobile: &str) -> RedeemResult<Vec<UsageReport>> {
        debug!("Listing reports for mobile {}", mobile);
        self.cached(
            cache_keys::reports_by_mobile(mobile),
            self.repository.find_by_mobile(mobile),
        )
        .await
    }

    async fn usage_count(&self, gift_code: &str) -> RedeemResult<UsageCount> {
        self.cached(cache_keys::usage_count(gift_code), async {
            Ok(UsageCount {
                gift_code: gift_code.to_string(),
                count_usage: self.repository.count_by_gift_code(gift_code).await?,
            })
        })
        .await
    }
}
