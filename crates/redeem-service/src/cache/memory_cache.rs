//! In-process cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use parking_lot::Mutex;
use redeem_core::{HealthCheck, HealthStatus, RedeemResult};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-local cache with per-entry expiry.
///
/// Expired entries are dropped when read and swept from the whole map on
/// every write, so the map never holds more than the live entries plus
/// those that lapsed since the last write. `set_if_absent` is atomic within
/// the process, so the redemption guard keeps its semantics on a single node.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.lock().values().filter(|e| e.is_live(now)).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sweep(entries: &mut HashMap<String, Entry>, now: Instant) {
    let before = entries.len();
    entries.retain(|_, entry| entry.is_live(now));
    let swept = before - entries.len();
    if swept > 0 {
        debug!("Swept {} expired cache entries", swept);
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    async fn get_raw(&self, key: &str) -> RedeemResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let value = match entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        };

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RedeemResult<()> {
        if ttl.is_zero() {
            debug!("Skipping cache write for key '{}' with zero TTL", key);
            return Ok(());
        }

        let now = Instant::now();
        let mut entries = self.entries.lock();
        sweep(&mut entries, now);
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> RedeemResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        sweep(&mut entries, now);
        if entries.contains_key(key) {
            return Ok(false);
        }

        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl.max(Duration::from_secs(1)),
            },
        );
        Ok(true)
    }

    async fn delete(&self, key: &str) -> RedeemResult<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .lock()
            .remove(key)
            .is_some_and(|entry| entry.is_live(now)))
    }

    async fn exists(&self, key: &str) -> RedeemResult<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .lock()
            .get(key)
            .is_some_and(|entry| entry.is_live(now)))
    }
}

#[async_trait]
impl HealthCheck for InMemoryCache {
    fn name(&self) -> &str {
        "memory-cache"
    }

    async fn check(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}
