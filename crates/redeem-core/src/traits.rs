//! Core traits shared across layers.

use crate::RedeemResult;
use async_trait::async_trait;

/// Trait for domain events.
///
/// Domain events represent something significant that happened
/// in the domain and are emitted to an external channel.
pub trait DomainEvent: Send + Sync {
    /// Returns the subject the event is published under.
    fn subject(&self) -> &'static str;

    /// Returns the aggregate ID that this event belongs to.
    fn aggregate_id(&self) -> String;

    /// Returns the event timestamp.
    fn timestamp(&self) -> chrono::DateTime<chrono::Utc>;

    /// Serializes the event to JSON.
    fn to_json(&self) -> RedeemResult<String>;
}

/// Trait for event publishers.
///
/// Delivery is at-least-once from the channel's point of view; callers do not
/// track acknowledgements.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes a raw payload under a subject.
    async fn publish(&self, subject: &str, payload: &[u8]) -> RedeemResult<()>;

    /// Serializes and publishes a domain event under its own subject.
    async fn publish_event(&self, event: &dyn DomainEvent) -> RedeemResult<()> {
        let json = event.to_json()?;
        self.publish(event.subject(), json.as_bytes()).await
    }
}

/// Trait for health checks.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Returns the name of this health check.
    fn name(&self) -> &str;

    /// Performs the health check.
    async fn check(&self) -> HealthStatus;
}

/// Health check status.
#[derive(Debug, Clone)]
pub enum HealthStatus {
    /// The component is healthy.
    Healthy,
    /// The component is degraded but functional.
    Degraded(String),
    /// The component is unhealthy.
    Unhealthy(String),
}

impl HealthStatus {
    /// Returns true if the status is healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Returns true if the status is unhealthy.
    #[must_use]
    pub const fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }
}
