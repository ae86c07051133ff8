//! Event channel adapters.
//!
//! Redis pub/sub for deployments that share a Redis instance with the cache,
//! and an in-process broadcast channel for single-node runs and tests.

mod broadcast_publisher;
mod redis_publisher;

pub use broadcast_publisher::{BroadcastEventPublisher, PublishedEvent};
pub use redis_publisher::RedisEventPublisher;
