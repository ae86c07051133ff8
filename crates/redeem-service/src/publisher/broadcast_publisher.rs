//! In-process event publisher.

use async_trait::async_trait;
use redeem_core::{EventPublisher, RedeemResult};
use tokio::sync::broadcast;
use tracing::debug;

/// An event as delivered to local subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedEvent {
    pub subject: String,
    pub payload: Vec<u8>,
}

/// Fans events out to in-process subscribers over a broadcast channel.
///
/// Publishing with no subscribers succeeds; the event is dropped.
pub struct BroadcastEventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
}

impl BroadcastEventPublisher {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventPublisher {
    async fn publish(&self, subject: &str, payload: &[u8]) -> RedeemResult<()> {
        let event = PublishedEvent {
            subject: subject.to_string(),
            payload: payload.to_vec(),
        };

        match self.sender.send(event) {
            Ok(receivers) => debug!("Delivered '{}' to {} local subscribers", subject, receivers),
            Err(_) => debug!("No local subscribers for '{}'", subject),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redeem_domain::{ReportCreated, UsageReport};
    use chrono::Utc;

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let publisher = BroadcastEventPublisher::new(8);
        let mut rx = publisher.subscribe();

        publisher.publish("discount:create", b"{}").await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.subject, "discount:create");
        assert_eq!(event.payload, b"{}");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_succeeds() {
        let publisher = BroadcastEventPublisher::new(8);
        publisher.publish("report:create", b"{}").await.unwrap();
    }

    #[tokio::test]
    async fn test_publish_event_uses_event_subject() {
        let publisher = BroadcastEventPublisher::new(8);
        let mut rx = publisher.subscribe();
        let now = Utc::now();

        publisher
            .publish_event(&ReportCreated::new(UsageReport {
                id: 9,
                gift_code: "WELCOME10".to_string(),
                mobile: "+1555".to_string(),
                charge_amount: 1000,
                report_time: now,
                created_at: now,
            }))
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.subject, "report:create");
        let json: serde_json::Value = serde_json::from_slice(&event.payload).unwrap();
        assert_eq!(json["mobile"], "+1555");
    }
}
