//! Dependency wiring.
//!
//! Collaborators are constructed explicitly and passed to constructors as
//! trait objects. Redis backs the cache, the redemption guard and the event
//! channel when enabled; otherwise the process falls back to an in-memory
//! cache and a local broadcast channel, which is only safe for a single
//! instance.

use deadpool_redis::{Pool, PoolConfig, Runtime};
use redeem_config::{AppConfig, RedisConfig};
use redeem_core::{EventPublisher, HealthCheck, RedeemError, RedeemResult};
use redeem_grpc::GrpcWalletClient;
use redeem_repository::{
    create_pool, DatabasePool, PgGiftCodeRepository, PgUsageLedger, PgUsageReportRepository,
};
use redeem_rest::AppState;
use redeem_service::{
    BroadcastEventPublisher, CacheAsideGiftCodeResolver, CacheInterface, CacheRedemptionGuard,
    GiftCodeResolver, GiftCodeService, GiftCodeServiceImpl, InMemoryCache, RedemptionService,
    RedemptionServiceImpl, RedisCacheService, RedisEventPublisher, ReportService,
    ReportServiceImpl, WalletClient,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Fully wired application.
pub struct AppModule {
    db_pool: Arc<DatabasePool>,
    redemption_service: Arc<dyn RedemptionService>,
    gift_code_service: Arc<dyn GiftCodeService>,
    report_service: Arc<dyn ReportService>,
    health_checks: Vec<Arc<dyn HealthCheck>>,
    attempt_timeout: Duration,
}

impl AppModule {
    /// Connects to Postgres (and Redis when enabled) and wires every service.
    pub async fn build(config: &AppConfig) -> RedeemResult<Self> {
        let db_pool = create_pool(&config.database).await?;
        let redis_pool = create_redis_pool(&config.redis)?;
        Self::wire(config, db_pool, redis_pool)
    }

    /// Wires services on top of already constructed pools.
    ///
    /// Must be called within a Tokio runtime because the wallet channel is
    /// created lazily on it.
    pub fn wire(
        config: &AppConfig,
        db_pool: Arc<DatabasePool>,
        redis_pool: Option<Arc<Pool>>,
    ) -> RedeemResult<Self> {
        let mut health_checks: Vec<Arc<dyn HealthCheck>> = vec![db_pool.clone()];

        let cache: Arc<dyn CacheInterface>;
        let publisher: Arc<dyn EventPublisher>;
        match redis_pool {
            Some(pool) => {
                let redis_cache = Arc::new(RedisCacheService::new(pool.clone()));
                let redis_publisher = Arc::new(RedisEventPublisher::new(
                    pool,
                    config.events.channel_prefix.clone(),
                ));
                health_checks.push(redis_cache.clone());
                health_checks.push(redis_publisher.clone());
                cache = redis_cache;
                publisher = redis_publisher;
            }
            None => {
                warn!("Redis disabled: cache, guard and events are local to this process");
                let memory_cache = Arc::new(InMemoryCache::new());
                health_checks.push(memory_cache.clone());
                cache = memory_cache;
                publisher = Arc::new(BroadcastEventPublisher::new(config.events.local_capacity));
            }
        }

        let gift_codes = Arc::new(PgGiftCodeRepository::new(db_pool.clone()));
        let reports = Arc::new(PgUsageReportRepository::new(db_pool.clone()));
        let ledger = Arc::new(PgUsageLedger::new(db_pool.clone()));

        let resolver: Arc<dyn GiftCodeResolver> =
            Arc::new(CacheAsideGiftCodeResolver::new(cache.clone(), gift_codes.clone()));
        let guard = Arc::new(CacheRedemptionGuard::new(
            cache.clone(),
            config.redemption.guard_ttl(),
        ));
        let wallet: Arc<dyn WalletClient> =
            Arc::new(GrpcWalletClient::connect_lazy(&config.wallet)?);

        let redemption_service: Arc<dyn RedemptionService> = Arc::new(RedemptionServiceImpl::new(
            ledger,
            guard,
            resolver.clone(),
            wallet,
            publisher.clone(),
            cache.clone(),
            config.redemption.clone(),
        ));
        let gift_code_service: Arc<dyn GiftCodeService> = Arc::new(GiftCodeServiceImpl::new(
            gift_codes,
            resolver,
            cache.clone(),
        ));
        let report_service: Arc<dyn ReportService> = Arc::new(ReportServiceImpl::new(
            reports,
            publisher,
            cache,
            config.redemption.report_cache_ttl(),
        ));

        info!("Application module wired");
        Ok(Self {
            db_pool,
            redemption_service,
            gift_code_service,
            report_service,
            health_checks,
            attempt_timeout: config.redemption.attempt_timeout(),
        })
    }

    /// Builds the state shared by HTTP handlers.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        self.health_checks.iter().cloned().fold(
            AppState::new(
                self.redemption_service.clone(),
                self.gift_code_service.clone(),
                self.report_service.clone(),
                self.attempt_timeout,
            ),
            AppState::with_health_check,
        )
    }

    /// Returns the database pool so it can be closed on shutdown.
    #[must_use]
    pub fn db_pool(&self) -> Arc<DatabasePool> {
        self.db_pool.clone()
    }
}

/// Creates the Redis pool, or `None` when Redis is disabled.
pub fn create_redis_pool(config: &RedisConfig) -> RedeemResult<Option<Arc<Pool>>> {
    if !config.enabled {
        return Ok(None);
    }

    let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
    redis_cfg.pool = Some(PoolConfig::new(config.pool_size as usize));

    let pool = redis_cfg
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| RedeemError::Cache(format!("Failed to create Redis pool: {}", e)))?;

    info!("Redis pool created for {}", config.url);
    Ok(Some(Arc::new(pool)))
}
