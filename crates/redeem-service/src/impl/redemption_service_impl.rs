//! Redemption orchestrator.

use crate::cache::{cache_keys, CacheInterface};
use crate::dto::{RedemptionReceipt, RedemptionRequest};
use crate::guard::RedemptionGuard;
use crate::redemption_service::RedemptionService;
use crate::resolver::GiftCodeResolver;
use crate::wallet::WalletClient;
use async_trait::async_trait;
use redeem_config::RedemptionConfig;
use redeem_core::{EventPublisher, RedeemError, RedeemResult, ValidateExt};
use redeem_domain::{DiscountCreated, NewUsageReport, RedemptionKey, DISCOUNT_CREATED_SUBJECT};
use redeem_repository::{UnitOfWork, UsageLedger};
use redeem_resilience::{with_timeout, CallContext};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Coordinates guard, terms lookup, usage ledger, wallet charge and event.
///
/// One call is one attempt:
///
/// ```text
/// acquire guard ─ resolve terms ─ check usage ─ charge ─ record usage
///   ─ commit ─ invalidate report caches ─ publish ─ release guard
/// ```
///
/// The guard only rejects overlapping attempts; the usage report is what
/// rejects a second redemption. A charge that succeeds before the report
/// write fails is not reversed.
pub struct RedemptionServiceImpl<L: UsageLedger> {
    ledger: Arc<L>,
    guard: Arc<dyn RedemptionGuard>,
    resolver: Arc<dyn GiftCodeResolver>,
    wallet: Arc<dyn WalletClient>,
    publisher: Arc<dyn EventPublisher>,
    cache: Arc<dyn CacheInterface>,
    config: RedemptionConfig,
}

impl<L: UsageLedger> RedemptionServiceImpl<L> {
    /// Creates a new redemption service.
    pub fn new(
        ledger: Arc<L>,
        guard: Arc<dyn RedemptionGuard>,
        resolver: Arc<dyn GiftCodeResolver>,
        wallet: Arc<dyn WalletClient>,
        publisher: Arc<dyn EventPublisher>,
        cache: Arc<dyn CacheInterface>,
        config: RedemptionConfig,
    ) -> Self {
        Self {
            ledger,
            guard,
            resolver,
            wallet,
            publisher,
            cache,
            config,
        }
    }

    /// Runs the attempt once the guard is held.
    async fn redeem(
        &self,
        ctx: &CallContext,
        key: &RedemptionKey,
        attempt: Uuid,
    ) -> RedeemResult<RedemptionReceipt> {
        if let Err(e) = ctx.run("guard record", self.guard.record(key, attempt)).await {
            warn!("Failed to record redemption request marker: {}", e);
        }

        let terms = ctx
            .run("resolve gift code", self.resolver.resolve(&key.gift_code))
            .await?;
        debug!(amount = terms.amount, "Gift code terms resolved");

        let mut uow = UnitOfWork::new(self.ledger.as_ref());

        let existing = ctx
            .run("find usage", uow.find_usage(&key.mobile, &key.gift_code))
            .await;
        match existing {
            Ok(None) => debug!("No prior usage"),
            Ok(Some(report)) => {
                rollback(uow).await;
                info!(report_id = report.id, "Gift code already redeemed");
                return Err(RedeemError::AlreadyRedeemed {
                    mobile: key.mobile.clone(),
                    gift_code: key.gift_code.clone(),
                });
            }
            Err(e) => {
                rollback(uow).await;
                error!("Usage lookup failed: {}", e);
                return Err(as_persistence(e, "usage lookup"));
            }
        }

        if let Err(e) = ctx
            .run("wallet charge", self.wallet.charge(&key.mobile, terms.amount))
            .await
        {
            rollback(uow).await;
            error!("Wallet charge failed: {}", e);
            return Err(as_external(e));
        }
        info!(amount = terms.amount, "Wallet charged");

        let usage = NewUsageReport::now(key, terms.amount);
        let recorded = ctx.run("record usage", uow.record_usage(&usage)).await;
        let report = match recorded {
            Ok(report) => report,
            Err(e) => {
                rollback(uow).await;
                error!(
                    amount = terms.amount,
                    "Usage report write failed after charge; charge is not reversed: {}", e
                );
                return Err(as_persistence(e, "record usage"));
            }
        };
        debug!(report_id = report.id, "Usage report written");

        match ctx.run("commit", uow.commit()).await {
            Ok(()) => {
                info!(report_id = report.id, "Usage committed");
                self.invalidate_reports(ctx, key).await;
            }
            Err(e) if self.config.fail_on_commit_error => {
                error!("Usage commit failed: {}", e);
                return Err(as_persistence(e, "commit"));
            }
            Err(e) => error!("Usage commit failed, continuing: {}", e),
        }

        let event = DiscountCreated::new(terms, key.mobile.clone());
        ctx.run("publish", self.publisher.publish_event(&event))
            .await
            .map_err(as_publish)?;
        info!(subject = DISCOUNT_CREATED_SUBJECT, "Redemption event published");

        Ok(RedemptionReceipt {
            mobile: key.mobile.clone(),
            gift_code: key.gift_code.clone(),
            amount: event.gift_code.amount,
            report_id: report.id,
            redeemed_at: event.redeemed_at,
        })
    }

    async fn invalidate_reports(&self, ctx: &CallContext, key: &RedemptionKey) {
        let keys = [
            cache_keys::reports_by_gift_code(&key.gift_code),
            cache_keys::reports_by_mobile(&key.mobile),
            cache_keys::usage_count(&key.gift_code),
        ];

        for cache_key in &keys {
            if let Err(e) = ctx.run("cache invalidate", self.cache.delete(cache_key)).await {
                warn!("Failed to invalidate cache key '{}': {}", cache_key, e);
            }
        }
    }

    /// Exit action of every attempt. Runs outside the call context so an
    /// expired or cancelled attempt still frees its key.
    async fn release_guard(&self, key: &RedemptionKey, acquired: bool) {
        if !acquired {
            debug!("Guard not held by this attempt, nothing to release");
            return;
        }

        let limit = self.config.release_timeout();
        match with_timeout("guard release", limit, self.guard.release(key)).await {
            Ok(()) => debug!("Guard released"),
            Err(e) => error!("Failed to release redemption guard: {}", e),
        }
    }

    /// Exit action when acquire was cut off by the deadline or cancellation.
    /// The store may have applied the write before the reply was lost, so the
    /// key is freed if the stored marker belongs to this attempt.
    async fn release_interrupted_guard(&self, key: &RedemptionKey, attempt: Uuid) {
        let limit = self.config.release_timeout();
        match with_timeout("guard release", limit, self.guard.release_if_owned(key, attempt)).await
        {
            Ok(true) => info!("Guard written by interrupted acquire released"),
            Ok(false) => debug!("Interrupted acquire left no guard of this attempt"),
            Err(e) => error!("Failed to release guard after interrupted acquire: {}", e),
        }
    }
}

#[async_trait]
impl<L: UsageLedger + 'static> RedemptionService for RedemptionServiceImpl<L> {
    async fn request_redemption(
        &self,
        ctx: &CallContext,
        request: RedemptionRequest,
    ) -> RedeemResult<RedemptionReceipt> {
        request.validate_request()?;
        let key = request.key();
        let attempt = Uuid::new_v4();
        let span = info_span!(
            "redemption",
            %attempt,
            mobile = %key.mobile,
            gift_code = %key.gift_code
        );

        async move {
            debug!("Redemption requested");

            let acquired = match ctx.run("guard acquire", self.guard.acquire(&key, attempt)).await {
                Ok(acquired) => acquired,
                Err(e @ (RedeemError::Timeout(_) | RedeemError::Cancelled(_))) => {
                    warn!("Guard acquire interrupted: {}", e);
                    self.release_interrupted_guard(&key, attempt).await;
                    return Err(e);
                }
                Err(e) => return Err(e),
            };

            let outcome = if acquired {
                self.redeem(ctx, &key, attempt).await
            } else {
                info!("Redemption already in progress");
                Err(RedeemError::AlreadyInProgress {
                    mobile: key.mobile.clone(),
                    gift_code: key.gift_code.clone(),
                })
            };

            self.release_guard(&key, acquired).await;

            match &outcome {
                Ok(receipt) => info!(report_id = receipt.report_id, "Redemption completed"),
                Err(e) => info!(code = e.error_code(), "Redemption failed: {}", e),
            }
            outcome
        }
        .instrument(span)
        .await
    }
}

async fn rollback<L: UsageLedger>(uow: UnitOfWork<'_, L>) {
    if let Err(e) = uow.rollback().await {
        warn!("Rollback failed: {}", e);
    }
}

fn as_persistence(err: RedeemError, step: &str) -> RedeemError {
    match err {
        RedeemError::Timeout(_) | RedeemError::Cancelled(_) => err,
        RedeemError::Persistence(_) => err.context(step),
        other => RedeemError::persistence(format!("{step}: {other}")),
    }
}

fn as_external(err: RedeemError) -> RedeemError {
    match err {
        RedeemError::Timeout(_) | RedeemError::Cancelled(_) | RedeemError::ExternalService { .. } => {
            err
        }
        other => RedeemError::external("wallet", other.to_string()),
    }
}

fn as_publish(err: RedeemError) -> RedeemError {
    match err {
        RedeemError::Timeout(_) | RedeemError::Cancelled(_) | RedeemError::Publish { .. } => err,
        other => RedeemError::publish(DISCOUNT_CREATED_SUBJECT, other.to_string()),
    }
}
