//! Wallet charge seam.

use async_trait::async_trait;
use redeem_core::RedeemResult;

/// Credits a customer's wallet with a gift code's amount.
///
/// The call is not idempotent; a successful charge cannot be undone by this
/// service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// Charges `amount` to the wallet identified by `mobile`.
    async fn charge(&self, mobile: &str, amount: i64) -> RedeemResult<()>;
}
