//! # Redeem Core
//!
//! Core types, traits, and error definitions for the Redeem gift code service.
//! Every other crate in the workspace builds on the error taxonomy and the
//! shared traits defined here.

pub mod error;
pub mod result;
pub mod telemetry;
pub mod traits;
pub mod validation;

pub use error::*;
pub use result::*;
pub use traits::*;
pub use validation::*;
