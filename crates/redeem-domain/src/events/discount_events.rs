//! Redemption domain events.

use crate::GiftCode;
use chrono::{DateTime, Utc};
use redeem_core::{DomainEvent, RedeemResult};
use serde::{Deserialize, Serialize};

/// Subject under which completed redemptions are announced.
pub const DISCOUNT_CREATED_SUBJECT: &str = "discount:create";

/// Event emitted once a redemption has been charged and recorded.
///
/// Carries the resolved gift code terms so downstream consumers do not need
/// to look them up again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCreated {
    #[serde(flatten)]
    pub gift_code: GiftCode,
    pub mobile: String,
    pub redeemed_at: DateTime<Utc>,
}

impl DiscountCreated {
    #[must_use]
    pub fn new(gift_code: GiftCode, mobile: impl Into<String>) -> Self {
        Self {
            gift_code,
            mobile: mobile.into(),
            redeemed_at: Utc::now(),
        }
    }
}

impl DomainEvent for DiscountCreated {
    fn subject(&self) -> &'static str {
        DISCOUNT_CREATED_SUBJECT
    }

    fn aggregate_id(&self) -> String {
        format!("{}:{}", self.mobile, self.gift_code.code)
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.redeemed_at
    }

    fn to_json(&self) -> RedeemResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
