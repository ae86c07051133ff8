//! Usage report DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to record a usage report directly.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    #[validate(custom(function = "redeem_core::validation::rules::valid_gift_code"))]
    pub gift_code: String,

    #[validate(custom(function = "redeem_core::validation::rules::valid_mobile"))]
    pub mobile: String,

    #[validate(range(min = 0, message = "Charge amount cannot be negative"))]
    pub charge_amount: i64,
}
