//! Prometheus metrics for the HTTP routes.
//!
//! Every route family (`discount`, `giftcharge`, `report`) counts incoming
//! requests per operation plus successful and failed responses. The recorder
//! is installed once per process and rendered by a dedicated `/metrics`
//! router so the scrape endpoint can live on its own listener.

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use redeem_core::{RedeemError, RedeemResult};
use std::time::{Duration, Instant};
use tracing::info;

/// Metric names for the HTTP routes.
pub mod names {
    /// Incoming requests per route family and operation.
    pub const HTTP_REQUESTS_TOTAL: &str = "redeem_http_requests_total";
    /// Requests answered with a non-error status.
    pub const HTTP_SUCCESS_TOTAL: &str = "redeem_http_success_total";
    /// Requests answered with a 4xx or 5xx status.
    pub const HTTP_ERRORS_TOTAL: &str = "redeem_http_errors_total";
    /// Request duration in seconds.
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "redeem_http_request_duration_seconds";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::HTTP_REQUESTS_TOTAL,
        "Total number of incoming HTTP requests"
    );
    describe_counter!(
        names::HTTP_SUCCESS_TOTAL,
        "Total number of successful HTTP requests"
    );
    describe_counter!(
        names::HTTP_ERRORS_TOTAL,
        "Total number of failed HTTP requests"
    );
    describe_histogram!(
        names::HTTP_REQUEST_DURATION_SECONDS,
        "HTTP request duration in seconds"
    );
}

/// Installs the process-wide Prometheus recorder and describes the metrics.
pub fn install_recorder() -> RedeemResult<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        RedeemError::Configuration(format!("Failed to install metrics recorder: {}", e))
    })?;
    register_metrics();
    info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// Family of routes a request is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteFamily {
    Discount,
    GiftCharge,
    Report,
}

impl RouteFamily {
    /// Label value of the family.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discount => "discount",
            Self::GiftCharge => "giftcharge",
            Self::Report => "report",
        }
    }
}

/// HTTP metrics recorder.
#[derive(Clone)]
pub struct HttpMetrics;

impl HttpMetrics {
    /// Record an incoming request for `operation` (method and route template).
    pub fn request(family: RouteFamily, operation: &str) {
        counter!(
            names::HTTP_REQUESTS_TOTAL,
            "route" => family.as_str(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    /// Record a finished request by its response status.
    pub fn response(family: RouteFamily, status: u16, duration: Duration) {
        if status >= 400 {
            counter!(
                names::HTTP_ERRORS_TOTAL,
                "route" => family.as_str(),
                "status" => status.to_string()
            )
            .increment(1);
        } else {
            counter!(names::HTTP_SUCCESS_TOTAL, "route" => family.as_str()).increment(1);
        }

        histogram!(
            names::HTTP_REQUEST_DURATION_SECONDS,
            "route" => family.as_str()
        )
        .record(duration.as_secs_f64());
    }
}

/// Counts requests of one route family. Apply with `route_layer` so the
/// matched route template is known.
pub async fn track_requests(
    State(family): State<RouteFamily>,
    request: Request,
    next: Next,
) -> Response {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path().to_string(), |p| p.as_str().to_string());
    let operation = format!("{} {}", request.method(), path);
    HttpMetrics::request(family, &operation);

    let start = Instant::now();
    let response = next.run(request).await;
    HttpMetrics::response(family, response.status().as_u16(), start.elapsed());

    response
}

/// Router exposing the Prometheus scrape endpoint at `/metrics`.
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .with_state(handle)
}

async fn render_metrics(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
