//! # Redeem Server Library
//!
//! Wiring and startup for the Redeem server: builds every collaborator from
//! configuration and serves the REST router until a shutdown signal.

pub mod di;
pub mod startup;
