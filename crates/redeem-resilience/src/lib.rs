//! # Redeem Resilience
//!
//! Deadline, timeout, and cancellation handling for calls that leave the process.

pub mod context;
pub mod timeout;

pub use context::*;
pub use timeout::*;
