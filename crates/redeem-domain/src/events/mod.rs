//! Domain events.

mod discount_events;
mod report_events;

pub use discount_events::*;
pub use report_events::*;
