//! # Redeem Repository
//!
//! Postgres data access for gift codes and usage reports.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn GiftCodeRepository> / Arc<dyn UsageReportRepository>
//!   ↓  UnitOfWork<'_, L: UsageLedger>   (one transaction per redemption)
//! Pg* implementations (SQLx)
//!   ↓
//! Postgres
//! ```

pub mod pool;
pub mod postgres;
pub mod traits;
pub mod unit_of_work;

pub use pool::*;
pub use postgres::*;
pub use traits::*;
pub use unit_of_work::*;
