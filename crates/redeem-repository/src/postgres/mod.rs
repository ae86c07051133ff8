//! Postgres implementations.

mod gift_code_repository;
mod rows;
mod usage_ledger;
mod usage_report_repository;

pub use gift_code_repository::PgGiftCodeRepository;
pub use usage_ledger::PgUsageLedger;
pub use usage_report_repository::PgUsageReportRepository;
