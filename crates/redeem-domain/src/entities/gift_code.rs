//! Gift code entity.

use crate::ValidityWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Charge terms of a redeemable promotional code.
///
/// Immutable after creation. A code is redeemable only while the current time
/// lies in `[validity_period_start, validity_period_end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct GiftCode {
    /// Surrogate identifier.
    pub id: i64,

    /// Public code customers redeem.
    pub code: String,

    /// First instant the code is redeemable.
    pub validity_period_start: DateTime<Utc>,

    /// First instant the code is no longer redeemable.
    pub validity_period_end: DateTime<Utc>,

    /// Amount charged to the customer's wallet, in minor units.
    pub amount: i64,

    /// Advisory usage cap carried with the terms.
    pub max_usage_count: i32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl GiftCode {
    /// Returns the validity window of this code.
    #[must_use]
    pub const fn window(&self) -> ValidityWindow {
        ValidityWindow {
            start: self.validity_period_start,
            end: self.validity_period_end,
        }
    }

    /// Checks if the code can be redeemed at `at`.
    #[must_use]
    pub fn is_redeemable_at(&self, at: DateTime<Utc>) -> bool {
        self.window().contains(at)
    }

    /// Cache lifetime for these terms: the time left in the window, never negative.
    #[must_use]
    pub fn cache_ttl(&self, now: DateTime<Utc>) -> Duration {
        self.window().remaining(now)
    }
}

/// Data required to insert a gift code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGiftCode {
    pub code: String,
    pub window: ValidityWindow,
    pub amount: i64,
    pub max_usage_count: i32,
}
