//! # Redeem REST
//!
//! HTTP transport for the Redeem gift code service: the redemption endpoint,
//! gift code administration, usage report queries, health probes and the
//! Prometheus scrape endpoint.

pub mod controllers;
pub mod extractors;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
