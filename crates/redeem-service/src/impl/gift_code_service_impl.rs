//! Gift code service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface, DEFAULT_TTL};
use crate::dto::{CreateGiftCodeRequest, GiftCodeFilter};
use crate::gift_code_service::GiftCodeService;
use crate::resolver::GiftCodeResolver;
use async_trait::async_trait;
use chrono::Utc;
use redeem_core::{RedeemError, RedeemResult, ValidateExt};
use redeem_domain::{GiftCode, NewGiftCode, ValidityWindow};
use redeem_repository::GiftCodeRepository;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Gift code service backed by the repository, with cached reads.
pub struct GiftCodeServiceImpl {
    repository: Arc<dyn GiftCodeRepository>,
    resolver: Arc<dyn GiftCodeResolver>,
    cache: Arc<dyn CacheInterface>,
}

impl GiftCodeServiceImpl {
    /// Creates a new gift code service.
    pub fn new(
        repository: Arc<dyn GiftCodeRepository>,
        resolver: Arc<dyn GiftCodeResolver>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            repository,
            resolver,
            cache,
        }
    }
}

#[async_trait]
impl GiftCodeService for GiftCodeServiceImpl {
    async fn create(&self, request: CreateGiftCodeRequest) -> RedeemResult<GiftCode> {
        request.validate_request()?;

        let window = ValidityWindow::new(request.validity_period_start, request.validity_period_end)
            .ok_or_else(|| {
                RedeemError::validation("validityPeriodStart must be before validityPeriodEnd")
            })?;

        let new_code = NewGiftCode {
            code: Uuid::new_v4().to_string(),
            window,
            amount: request.amount,
            max_usage_count: request.max_usage_count,
        };

        let created = self.repository.create(&new_code).await?;
        info!("Gift code created: {} ({})", created.code, created.id);
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> RedeemResult<GiftCode> {
        let key = cache_keys::gift_code_by_id(id);

        match self.cache.get::<GiftCode>(&key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!("Gift code cache read failed for id {}: {}", id, e),
        }

        debug!("Loading gift code {} from store", id);
        let gift_code = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RedeemError::not_found("GiftCode", id))?;

        if let Err(e) = self.cache.set(&key, &gift_code, DEFAULT_TTL).await {
            warn!("Failed to cache gift code {}: {}", id, e);
        }
        Ok(gift_code)
    }

    async fn get_by_code(&self, code: &str) -> RedeemResult<GiftCode> {
        self.resolver.resolve(code).await
    }

    async fn list(&self, filter: GiftCodeFilter) -> RedeemResult<Vec<GiftCode>> {
        debug!("Listing gift codes: {:?}", filter);
        let now = Utc::now();

        match filter {
            GiftCodeFilter::All => self.repository.find_all().await,
            GiftCodeFilter::Valid => self.repository.find_valid(now).await,
            GiftCodeFilter::Invalid => self.repository.find_invalid(now).await,
        }
    }
}
