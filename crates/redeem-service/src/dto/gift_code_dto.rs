//! Gift code DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a gift code. The code itself is generated.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGiftCodeRequest {
    pub validity_period_start: DateTime<Utc>,

    pub validity_period_end: DateTime<Utc>,

    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,

    #[validate(range(min = 0, message = "Max usage count cannot be negative"))]
    pub max_usage_count: i32,
}

/// Which gift codes a listing returns, evaluated at the time of the call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GiftCodeFilter {
    #[default]
    All,
    /// Codes whose validity window contains now.
    Valid,
    /// Codes not yet started or already ended.
    Invalid,
}

impl GiftCodeFilter {
    /// Maps the optional `isValid` query flag onto a filter.
    #[must_use]
    pub const fn from_is_valid(is_valid: Option<bool>) -> Self {
        match is_valid {
            None => Self::All,
            Some(true) => Self::Valid,
            Some(false) => Self::Invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use redeem_core::ValidateExt;

    fn request(amount: i64, max_usage_count: i32) -> CreateGiftCodeRequest {
        let now = Utc::now();
        CreateGiftCodeRequest {
            validity_period_start: now,
            validity_period_end: now + Duration::days(1),
            amount,
            max_usage_count,
        }
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(request(1000, 5).validate_request().is_ok());
        assert!(request(0, 5).validate_request().is_err());
        assert!(request(1000, -1).validate_request().is_err());
    }

    #[test]
    fn test_filter_from_flag() {
        assert_eq!(GiftCodeFilter::from_is_valid(None), GiftCodeFilter::All);
        assert_eq!(GiftCodeFilter::from_is_valid(Some(true)), GiftCodeFilter::Valid);
        assert_eq!(GiftCodeFilter::from_is_valid(Some(false)), GiftCodeFilter::Invalid);
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let json = r#"{
            "validityPeriodStart": "2024-01-01T00:00:00Z",
            "validityPeriodEnd": "2024-02-01T00:00:00Z",
            "amount": 1000,
            "maxUsageCount": 10
        }"#;
        let request: CreateGiftCodeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount, 1000);
        assert_eq!(request.max_usage_count, 10);
    }
}
