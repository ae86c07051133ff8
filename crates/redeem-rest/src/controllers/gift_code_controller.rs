//! Gift code administration controller.

use crate::{
    extractors::ValidatedJson,
    metrics::{track_requests, RouteFamily},
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use redeem_domain::GiftCode;
use redeem_service::{CreateGiftCodeRequest, GiftCodeFilter};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

/// Query string of the gift code listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct GiftCodeListQuery {
    /// `true` for codes inside their window, `false` for codes outside it.
    pub is_valid: Option<bool>,
}

/// Creates the gift code router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/giftCharge", get(list_gift_codes).post(create_gift_code))
        .route("/giftCharge/:id", get(get_gift_code))
        .route("/giftCharge/code/:code", get(get_gift_code_by_code))
        .route_layer(middleware::from_fn_with_state(
            RouteFamily::GiftCharge,
            track_requests,
        ))
}

/// Create a gift code with a generated code.
#[utoipa::path(
    post,
    path = "/giftCharge",
    tag = "gift-codes",
    request_body = CreateGiftCodeRequest,
    responses(
        (status = 201, description = "Gift code created", body = GiftCode),
        (status = 400, description = "Validity window is inverted", body = redeem_core::ErrorResponse),
        (status = 422, description = "Invalid request body", body = redeem_core::ErrorResponse)
    )
)]
pub async fn create_gift_code(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateGiftCodeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GiftCode>>), AppError> {
    debug!("Create gift code request: amount {}", request.amount);

    let gift_code = state.gift_code_service.create(request).await?;
    Ok(created(gift_code))
}

/// Get a gift code by its identifier.
#[utoipa::path(
    get,
    path = "/giftCharge/{id}",
    tag = "gift-codes",
    params(("id" = i64, Path, description = "Gift code identifier")),
    responses(
        (status = 200, description = "Gift code found", body = GiftCode),
        (status = 404, description = "Gift code not found", body = redeem_core::ErrorResponse)
    )
)]
pub async fn get_gift_code(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<GiftCode> {
    let gift_code = state.gift_code_service.get_by_id(id).await?;
    ok(gift_code)
}

/// Get the terms of a gift code that is redeemable now.
#[utoipa::path(
    get,
    path = "/giftCharge/code/{code}",
    tag = "gift-codes",
    params(("code" = String, Path, description = "Gift code")),
    responses(
        (status = 200, description = "Gift code is redeemable", body = GiftCode),
        (status = 404, description = "Gift code unknown or outside its validity window", body = redeem_core::ErrorResponse)
    )
)]
pub async fn get_gift_code_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<GiftCode> {
    ok(state.gift_code_service.get_by_code(&code).await?)
}

/// List gift codes, optionally filtered by validity.
#[utoipa::path(
    get,
    path = "/giftCharge",
    tag = "gift-codes",
    params(GiftCodeListQuery),
    responses(
        (status = 200, description = "Gift codes", body = Vec<GiftCode>)
    )
)]
pub async fn list_gift_codes(
    State(state): State<AppState>,
    Query(query): Query<GiftCodeListQuery>,
) -> ApiResult<Vec<GiftCode>> {
    let filter = GiftCodeFilter::from_is_valid(query.is_valid);
    let gift_codes = state.gift_code_service.list(filter).await?;
    ok(gift_codes)
}
