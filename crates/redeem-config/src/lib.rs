//! # Redeem Config
//!
//! Configuration management for the Redeem service.
//! Supports layered configuration from files and environment variables,
//! validated on load, with runtime refresh.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
