//! Gift code redemption controller.

use crate::{
    extractors::ValidatedJson,
    metrics::{track_requests, RouteFamily},
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{extract::State, middleware, routing::post, Router};
use redeem_service::{RedemptionReceipt, RedemptionRequest};
use tracing::debug;

/// Creates the discount router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/discount", post(redeem))
        .route_layer(middleware::from_fn_with_state(
            RouteFamily::Discount,
            track_requests,
        ))
}

/// Redeem a gift code for the customer's wallet.
#[utoipa::path(
    post,
    path = "/discount",
    tag = "discount",
    request_body = RedemptionRequest,
    responses(
        (status = 200, description = "Gift code redeemed", body = RedemptionReceipt),
        (status = 404, description = "Gift code unknown or outside its validity window", body = redeem_core::ErrorResponse),
        (status = 409, description = "Already redeemed or an attempt is in progress", body = redeem_core::ErrorResponse),
        (status = 422, description = "Invalid request body", body = redeem_core::ErrorResponse),
        (status = 502, description = "Wallet charge or event publish failed", body = redeem_core::ErrorResponse)
    )
)]
pub async fn redeem(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RedemptionRequest>,
) -> ApiResult<RedemptionReceipt> {
    debug!("Redemption request: {} {}", request.mobile, request.gift_code);

    let ctx = state.attempt_context();
    let receipt = state
        .redemption_service
        .request_redemption(&ctx, request)
        .await?;
    ok(receipt)
}
