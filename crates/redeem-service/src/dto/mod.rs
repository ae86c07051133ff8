//! Data Transfer Objects (DTOs).

mod gift_code_dto;
mod redemption_dto;
mod report_dto;

pub use gift_code_dto::*;
pub use redemption_dto::*;
pub use report_dto::*;
