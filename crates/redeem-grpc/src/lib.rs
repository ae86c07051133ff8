//! # Redeem gRPC
//!
//! gRPC client for the external wallet service that redemptions charge.
//! Client and messages are generated from `proto/wallet.proto` at build time.

pub mod clients;
pub mod proto;

pub use clients::*;
