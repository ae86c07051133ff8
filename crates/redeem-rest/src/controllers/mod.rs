//! REST API controllers.

pub mod discount_controller;
pub mod gift_code_controller;
pub mod health_controller;
pub mod report_controller;

pub use health_controller::*;
