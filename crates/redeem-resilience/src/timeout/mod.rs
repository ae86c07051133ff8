//! Standalone time limit for calls made outside a `CallContext`.

use redeem_core::{RedeemError, RedeemResult};
use std::future::Future;
use std::time::Duration;

/// Runs `future` for at most `limit`, reporting expiry as `Timeout(operation)`.
pub async fn with_timeout<F, T>(operation: &str, limit: Duration, future: F) -> RedeemResult<T>
where
    F: Future<Output = RedeemResult<T>>,
{
    tokio::time::timeout(limit, future)
        .await
        .unwrap_or_else(|_| Err(RedeemError::Timeout(operation.to_string())))
}
