//! Redemption key value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one customer's claim on one gift code.
///
/// At most one redemption attempt per key may be in flight, and at most one
/// usage report per key may ever exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionKey {
    pub mobile: String,
    pub gift_code: String,
}

impl RedemptionKey {
    #[must_use]
    pub fn new(mobile: impl Into<String>, gift_code: impl Into<String>) -> Self {
        Self {
            mobile: mobile.into(),
            gift_code: gift_code.into(),
        }
    }
}

impl fmt::Display for RedemptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.mobile, self.gift_code)
    }
}
