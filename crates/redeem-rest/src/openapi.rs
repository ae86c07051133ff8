//! OpenAPI documentation for the REST API.

use crate::controllers::{
    discount_controller, gift_code_controller, health_controller, report_controller,
};
use redeem_core::{ErrorResponse, FieldError};
use redeem_domain::{GiftCode, UsageCount, UsageReport};
use redeem_service::{
    CreateGiftCodeRequest, CreateReportRequest, GiftCodeFilter, RedemptionReceipt,
    RedemptionRequest,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Redeem API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Redeem API",
        version = "1.0.0",
        description = "Gift code redemption and usage reporting"
    ),
    paths(
        discount_controller::redeem,
        gift_code_controller::create_gift_code,
        gift_code_controller::get_gift_code,
        gift_code_controller::get_gift_code_by_code,
        gift_code_controller::list_gift_codes,
        report_controller::create_report,
        report_controller::reports_by_gift_code,
        report_controller::usage_count,
        report_controller::reports_by_mobile,
        health_controller::health_check,
        health_controller::readiness_check,
        health_controller::liveness_check,
    ),
    components(
        schemas(
            ErrorResponse,
            FieldError,
            GiftCode,
            UsageReport,
            UsageCount,
            RedemptionRequest,
            RedemptionReceipt,
            CreateGiftCodeRequest,
            GiftCodeFilter,
            CreateReportRequest,
            health_controller::HealthResponse,
            health_controller::ReadinessResponse,
        )
    ),
    tags(
        (name = "discount", description = "Gift code redemption"),
        (name = "gift-codes", description = "Gift code administration"),
        (name = "reports", description = "Usage reports"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
