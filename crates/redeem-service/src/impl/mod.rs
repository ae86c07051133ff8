//! Service implementations.
//!
//! This module contains the concrete implementations of service traits.
//! Trait definitions live in the parent module (e.g. `redemption_service.rs`).

pub mod gift_code_service_impl;
pub mod redemption_service_impl;
pub mod report_service_impl;

pub use gift_code_service_impl::GiftCodeServiceImpl;
pub use redemption_service_impl::RedemptionServiceImpl;
pub use report_service_impl::ReportServiceImpl;
