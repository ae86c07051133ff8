//! Domain value objects.

mod redemption_key;
mod validity_window;

pub use redemption_key::*;
pub use validity_window::*;
