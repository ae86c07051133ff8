//! Redemption service trait definition.

use crate::dto::{RedemptionReceipt, RedemptionRequest};
use async_trait::async_trait;
use redeem_core::RedeemResult;
use redeem_resilience::CallContext;

/// Redeems gift codes on behalf of customers.
#[async_trait]
pub trait RedemptionService: Send + Sync {
    /// Charges the gift code's amount to the customer's wallet exactly once.
    ///
    /// Fails with `AlreadyInProgress` while another attempt for the same
    /// customer and code is running, `AlreadyRedeemed` once a usage report
    /// exists, and `NotFound` when the code is unknown or outside its window.
    async fn request_redemption(
        &self,
        ctx: &CallContext,
        request: RedemptionRequest,
    ) -> RedeemResult<RedemptionReceipt>;
}
