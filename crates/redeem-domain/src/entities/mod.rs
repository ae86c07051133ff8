//! Domain entities.

mod gift_code;
mod usage_report;

pub use gift_code::*;
pub use usage_report::*;
