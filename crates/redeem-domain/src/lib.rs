//! # Redeem Domain
//!
//! Gift codes, usage reports, and the events emitted when a gift code is
//! redeemed or a usage report is recorded.

pub mod entities;
pub mod events;
pub mod value_objects;

pub use entities::*;
pub use events::*;
pub use value_objects::*;
