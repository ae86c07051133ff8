//! Caching infrastructure for the service layer.
//!
//! A cache abstraction with a Redis implementation for shared deployments and
//! an in-process implementation for single-node runs and tests. The cache
//! also backs the redemption guard through its set-if-absent primitive.

mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use memory_cache::InMemoryCache;
pub use redis_cache::RedisCacheService;

use std::time::Duration;

/// Default TTL for cached records (1 hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);
