//! Postgres usage report repository implementation.

use super::rows::{ReportRow, REPORT_COLUMNS};
use crate::{DatabasePool, UsageReportRepository};
use async_trait::async_trait;
use redeem_core::RedeemResult;
use redeem_domain::{NewUsageReport, UsageReport};
use std::sync::Arc;
use tracing::debug;

/// Postgres usage report repository.
#[derive(Clone)]
pub struct PgUsageReportRepository {
    pool: Arc<DatabasePool>,
}

impl PgUsageReportRepository {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageReportRepository for PgUsageReportRepository {
    async fn create(&self, report: &NewUsageReport) -> RedeemResult<UsageReport> {
        debug!("Creating usage report: {}/{}", report.mobile, report.gift_code);

        let row = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            INSERT INTO reports (gift_code, mobile, charge_amount, report_time)
            VALUES ($1, $2, $3, $4)
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(&report.gift_code)
        .bind(&report.mobile)
        .bind(report.charge_amount)
        .bind(report.report_time)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(row.into())
    }

    async fn find_by_gift_code(&self, gift_code: &str) -> RedeemResult<Vec<UsageReport>> {
        debug!("Finding reports by gift code: {}", gift_code);

        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE gift_code = $1 ORDER BY report_time, id"
        ))
        .bind(gift_code)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(UsageReport::from).collect())
    }

    async fn find_by_mobile(&self, mobile: &str) -> RedeemResult<Vec<UsageReport>> {
        debug!("Finding reports by mobile: {}", mobile);

        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE mobile = $1 ORDER BY report_time, id"
        ))
        .bind(mobile)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(UsageReport::from).collect())
    }

    async fn count_by_gift_code(&self, gift_code: &str) -> RedeemResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports WHERE gift_code = $1")
            .bind(gift_code)
            .fetch_one(self.pool.inner())
            .await?;

        Ok(count)
    }
}
