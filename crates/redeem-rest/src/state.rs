//! Application state for Axum handlers.

use redeem_core::HealthCheck;
use redeem_resilience::CallContext;
use redeem_service::{GiftCodeService, RedemptionService, ReportService};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub redemption_service: Arc<dyn RedemptionService>,
    pub gift_code_service: Arc<dyn GiftCodeService>,
    pub report_service: Arc<dyn ReportService>,
    /// Dependencies probed by the readiness endpoint.
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
    /// Deadline of one redemption attempt.
    pub attempt_timeout: Duration,
    /// Cancelled when the server begins shutting down.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        redemption_service: Arc<dyn RedemptionService>,
        gift_code_service: Arc<dyn GiftCodeService>,
        report_service: Arc<dyn ReportService>,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            redemption_service,
            gift_code_service,
            report_service,
            health_checks: Vec::new(),
            attempt_timeout,
            shutdown: CancellationToken::new(),
        }
    }

    /// Adds a dependency to the readiness probe.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }

    /// Ties in-flight requests to a shutdown signal.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Call context for one redemption attempt.
    #[must_use]
    pub fn attempt_context(&self) -> CallContext {
        CallContext::with_timeout(self.attempt_timeout).cancelled_by(&self.shutdown)
    }
}
