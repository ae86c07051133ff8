//! Usage report service trait definition.

use crate::dto::CreateReportRequest;
use async_trait::async_trait;
use redeem_core::RedeemResult;
use redeem_domain::{UsageCount, UsageReport};

/// Queries over recorded redemptions.
#[async_trait]
pub trait ReportService: Send + Sync {
    /// Records a usage report and announces it.
    async fn create(&self, request: CreateReportRequest) -> RedeemResult<UsageReport>;

    /// Lists reports for a gift code.
    async fn by_gift_code(&self, gift_code: &str) -> RedeemResult<Vec<UsageReport>>;

    /// Lists reports for a customer.
    async fn by_mobile(&self, mobile: &str) -> RedeemResult<Vec<UsageReport>>;

    /// Counts reports for a gift code.
    async fn usage_count(&self, gift_code: &str) -> RedeemResult<UsageCount>;
}
