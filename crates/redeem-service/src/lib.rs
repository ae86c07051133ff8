//! # Redeem Service
//!
//! Business logic for gift code redemption: the redemption orchestrator and
//! the collaborators it coordinates (in-flight guard, cache-aside terms
//! lookup, wallet charge, event channel), plus gift code administration and
//! usage report queries.

pub mod cache;
pub mod dto;
pub mod gift_code_service;
pub mod guard;
pub mod r#impl;
pub mod publisher;
pub mod redemption_service;
pub mod report_service;
pub mod resolver;
pub mod wallet;

#[cfg(test)]
mod test_support;

pub use cache::*;
pub use dto::*;
pub use gift_code_service::*;
pub use guard::*;
pub use r#impl::*;
pub use publisher::*;
pub use redemption_service::*;
pub use report_service::*;
pub use resolver::*;
pub use wallet::*;
