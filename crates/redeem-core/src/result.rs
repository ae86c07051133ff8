//! Result type aliases for the Redeem service.

use crate::RedeemError;

/// A specialized `Result` type for Redeem operations.
pub type RedeemResult<T> = Result<T, RedeemError>;
