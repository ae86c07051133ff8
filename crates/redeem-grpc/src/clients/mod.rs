//! Remote clients for services this one depends on.

mod wallet_client;

pub use wallet_client::*;
