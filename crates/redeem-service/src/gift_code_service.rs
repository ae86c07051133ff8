//! Gift code service trait definition.

use crate::dto::{CreateGiftCodeRequest, GiftCodeFilter};
use async_trait::async_trait;
use redeem_core::RedeemResult;
use redeem_domain::GiftCode;

/// Administration of gift codes.
#[async_trait]
pub trait GiftCodeService: Send + Sync {
    /// Creates a gift code with a generated code.
    async fn create(&self, request: CreateGiftCodeRequest) -> RedeemResult<GiftCode>;

    /// Gets a gift code by ID.
    async fn get_by_id(&self, id: i64) -> RedeemResult<GiftCode>;

    /// Gets the terms of a code that is redeemable now.
    async fn get_by_code(&self, code: &str) -> RedeemResult<GiftCode>;

    /// Lists gift codes matching `filter` at the time of the call.
    async fn list(&self, filter: GiftCodeFilter) -> RedeemResult<Vec<GiftCode>>;
}
