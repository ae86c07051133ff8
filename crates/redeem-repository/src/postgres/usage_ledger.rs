//! Postgres transactional ledger used by redemptions.

use super::rows::{ReportRow, REPORT_COLUMNS};
use crate::{DatabasePool, TransactionManager, UsageLedger};
use async_trait::async_trait;
use redeem_core::{RedeemError, RedeemResult};
use redeem_domain::{NewUsageReport, UsageReport};
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tracing::debug;

/// Usage ledger backed by Postgres transactions.
#[derive(Clone)]
pub struct PgUsageLedger {
    pool: Arc<DatabasePool>,
}

impl PgUsageLedger {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PgUsageLedger {
    type Tx = Transaction<'static, Postgres>;

    async fn begin(&self) -> RedeemResult<Self::Tx> {
        self.pool
            .inner()
            .begin()
            .await
            .map_err(|e| RedeemError::Persistence(format!("Failed to begin transaction: {}", e)))
    }

    async fn commit(&self, tx: Self::Tx) -> RedeemResult<()> {
        tx.commit()
            .await
            .map_err(|e| RedeemError::Persistence(format!("Failed to commit transaction: {}", e)))
    }

    async fn rollback(&self, tx: Self::Tx) -> RedeemResult<()> {
        tx.rollback()
            .await
            .map_err(|e| RedeemError::Persistence(format!("Failed to roll back transaction: {}", e)))
    }
}

#[async_trait]
impl UsageLedger for PgUsageLedger {
    async fn find_usage(
        &self,
        tx: &mut Self::Tx,
        mobile: &str,
        gift_code: &str,
    ) -> RedeemResult<Option<UsageReport>> {
        debug!("Checking usage for {}/{}", mobile, gift_code);

        let row = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE mobile = $1 AND gift_code = $2"
        ))
        .bind(mobile)
        .bind(gift_code)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(UsageReport::from))
    }

    async fn record_usage(
        &self,
        tx: &mut Self::Tx,
        report: &NewUsageReport,
    ) -> RedeemResult<UsageReport> {
        debug!("Recording usage for {}/{}", report.mobile, report.gift_code);

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
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.into())
    }
}
