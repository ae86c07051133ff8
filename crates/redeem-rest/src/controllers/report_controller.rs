//! Usage report controller.

use crate::{
    extractors::ValidatedJson,
    metrics::{track_requests, RouteFamily},
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use redeem_domain::{UsageCount, UsageReport};
use redeem_service::CreateReportRequest;

/// Creates the report router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/report", post(create_report))
        .route("/report/giftCode/:code", get(reports_by_gift_code))
        .route("/report/giftCode/:code/count", get(usage_count))
        .route("/report/mobile/:mobile", get(reports_by_mobile))
        .route_layer(middleware::from_fn_with_state(
            RouteFamily::Report,
            track_requests,
        ))
}

/// Record a usage report directly.
#[utoipa::path(
    post,
    path = "/report",
    tag = "reports",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report recorded", body = UsageReport),
        (status = 409, description = "Customer already has a report for this code", body = redeem_core::ErrorResponse),
        (status = 422, description = "Invalid request body", body = redeem_core::ErrorResponse)
    )
)]
pub async fn create_report(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateReportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UsageReport>>), AppError> {
    let report = state.report_service.create(request).await?;
    Ok(created(report))
}

/// List the usage reports of a gift code.
#[utoipa::path(
    get,
    path = "/report/giftCode/{code}",
    tag = "reports",
    params(("code" = String, Path, description = "Gift code")),
    responses((status = 200, description = "Usage reports", body = Vec<UsageReport>))
)]
pub async fn reports_by_gift_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Vec<UsageReport>> {
    ok(state.report_service.by_gift_code(&code).await?)
}

/// Count how many customers redeemed a gift code.
#[utoipa::path(
    get,
    path = "/report/giftCode/{code}/count",
    tag = "reports",
    params(("code" = String, Path, description = "Gift code")),
    responses((status = 200, description = "Usage count", body = UsageCount))
)]
pub async fn usage_count(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<UsageCount> {
    ok(state.report_service.usage_count(&code).await?)
}

/// List the usage reports of a customer.
#[utoipa::path(
    get,
    path = "/report/mobile/{mobile}",
    tag = "reports",
    params(("mobile" = String, Path, description = "Customer mobile number")),
    responses((status = 200, description = "Usage reports", body = Vec<UsageReport>))
)]
pub async fn reports_by_mobile(
    State(state): State<AppState>,
    Path(mobile): Path<String>,
) -> ApiResult<Vec<UsageReport>> {
    ok(state.report_service.by_mobile(&mobile).await?)
}
