//! Repository trait definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redeem_core::RedeemResult;
use redeem_domain::{GiftCode, NewGiftCode, NewUsageReport, UsageReport};

/// Gift code repository trait.
#[async_trait]
pub trait GiftCodeRepository: Send + Sync {
    /// Persists a new gift code.
    async fn create(&self, gift_code: &NewGiftCode) -> RedeemResult<GiftCode>;

    /// Finds a gift code by ID.
    async fn find_by_id(&self, id: i64) -> RedeemResult<Option<GiftCode>>;

    /// Finds a gift code whose validity window contains `at`.
    async fn find_active_by_code(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> RedeemResult<Option<GiftCode>>;

    /// Lists all gift codes.
    async fn find_all(&self) -> RedeemResult<Vec<GiftCode>>;

    /// Lists gift codes redeemable at `at`.
    async fn find_valid(&self, at: DateTime<Utc>) -> RedeemResult<Vec<GiftCode>>;

    /// Lists gift codes not redeemable at `at`.
    async fn find_invalid(&self, at: DateTime<Utc>) -> RedeemResult<Vec<GiftCode>>;
}

/// Usage report repository trait.
#[async_trait]
pub trait UsageReportRepository: Send + Sync {
    /// Persists a new usage report outside any caller transaction.
    async fn create(&self, report: &NewUsageReport) -> RedeemResult<UsageReport>;

    /// Lists reports for a gift code.
    async fn find_by_gift_code(&self, gift_code: &str) -> RedeemResult<Vec<UsageReport>>;

    /// Lists reports for a customer.
    async fn find_by_mobile(&self, mobile: &str) -> RedeemResult<Vec<UsageReport>>;

    /// Counts reports recorded for a gift code.
    async fn count_by_gift_code(&self, gift_code: &str) -> RedeemResult<i64>;
}

/// Begins and finishes store transactions.
///
/// A transaction handed out by [`begin`](Self::begin) must be passed to
/// exactly one of [`commit`](Self::commit) or [`rollback`](Self::rollback).
/// Both take the handle by value so it cannot be used afterwards.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// Open transaction handle.
    type Tx: Send;

    async fn begin(&self) -> RedeemResult<Self::Tx>;

    async fn commit(&self, tx: Self::Tx) -> RedeemResult<()>;

    async fn rollback(&self, tx: Self::Tx) -> RedeemResult<()>;
}

/// Transactional reads and writes taking part in a redemption.
#[async_trait]
pub trait UsageLedger: TransactionManager {
    /// Finds the usage report for `(mobile, gift_code)`, if any.
    async fn find_usage(
        &self,
        tx: &mut Self::Tx,
        mobile: &str,
        gift_code: &str,
    ) -> RedeemResult<Option<UsageReport>>;

    /// Inserts a usage report.
    async fn record_usage(
        &self,
        tx: &mut Self::Tx,
        report: &NewUsageReport,
    ) -> RedeemResult<UsageReport>;
}
