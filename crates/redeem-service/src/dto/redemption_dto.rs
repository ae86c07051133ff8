//! Redemption DTOs.

use chrono::{DateTime, Utc};
use redeem_domain::RedemptionKey;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to redeem a gift code for a customer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionRequest {
    #[validate(custom(function = "redeem_core::validation::rules::valid_mobile"))]
    pub mobile: String,

    #[validate(custom(function = "redeem_core::validation::rules::valid_gift_code"))]
    pub gift_code: String,
}

impl RedemptionRequest {
    #[must_use]
    pub fn new(mobile: impl Into<String>, gift_code: impl Into<String>) -> Self {
        Self {
            mobile: mobile.into(),
            gift_code: gift_code.into(),
        }
    }

    /// Key identifying this customer's claim on the code.
    #[must_use]
    pub fn key(&self) -> RedemptionKey {
        RedemptionKey::new(self.mobile.clone(), self.gift_code.clone())
    }
}

/// Outcome of a successful redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionReceipt {
    pub mobile: String,
    pub gift_code: String,
    /// Amount charged, in minor units.
    pub amount: i64,
    /// ID of the usage report recorded for this redemption.
    pub report_id: i64,
    pub redeemed_at: DateTime<Utc>,
}
