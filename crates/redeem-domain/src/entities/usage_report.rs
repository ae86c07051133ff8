//! Usage report entity.

use crate::RedemptionKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable record that a customer redeemed a gift code.
///
/// Created once per successful redemption, never mutated or deleted. Its
/// existence for a `(mobile, gift_code)` pair is what "already redeemed" means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    pub id: i64,
    pub gift_code: String,
    pub mobile: String,
    pub charge_amount: i64,
    pub report_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl UsageReport {
    /// Returns the redemption key this report settles.
    #[must_use]
    pub fn key(&self) -> RedemptionKey {
        RedemptionKey::new(self.mobile.clone(), self.gift_code.clone())
    }
}

/// Data required to insert a usage report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUsageReport {
    pub gift_code: String,
    pub mobile: String,
    pub charge_amount: i64,
    pub report_time: DateTime<Utc>,
}

impl NewUsageReport {
    /// Report for a redemption happening now.
    #[must_use]
    pub fn now(key: &RedemptionKey, charge_amount: i64) -> Self {
        Self {
            gift_code: key.gift_code.clone(),
            mobile: key.mobile.clone(),
            charge_amount,
            report_time: Utc::now(),
        }
    }
}

/// Number of usage reports recorded for a gift code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UsageCount {
    pub gift_code: String,
    pub count_usage: i64,
}
