//! Row types shared by the Postgres repositories.

use chrono::{DateTime, Utc};
use redeem_domain::{GiftCode, UsageReport};
use sqlx::FromRow;

pub(crate) const GIFT_CODE_COLUMNS: &str = "id, code, validity_period_start, validity_period_end, \
     amount, max_usage_count, created_at, updated_at";

pub(crate) const REPORT_COLUMNS: &str =
    "id, gift_code, mobile, charge_amount, report_time, created_at";

/// Database row representation of a gift code.
#[derive(Debug, FromRow)]
pub(crate) struct GiftCodeRow {
    id: i64,
    code: String,
    validity_period_start: DateTime<Utc>,
    validity_period_end: DateTime<Utc>,
    amount: i64,
    max_usage_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GiftCodeRow> for GiftCode {
    fn from(row: GiftCodeRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            validity_period_start: row.validity_period_start,
            validity_period_end: row.validity_period_end,
            amount: row.amount,
            max_usage_count: row.max_usage_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row representation of a usage report.
#[derive(Debug, FromRow)]
pub(crate) struct ReportRow {
    id: i64,
    gift_code: String,
    mobile: String,
    charge_amount: i64,
    report_time: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<ReportRow> for UsageReport {
    fn from(row: ReportRow) -> Self {
        Self {
            id: row.id,
            gift_code: row.gift_code,
            mobile: row.mobile,
            charge_amount: row.charge_amount,
            report_time: row.report_time,
            created_at: row.created_at,
        }
    }
}
