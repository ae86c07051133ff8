//! Postgres gift code repository implementation.

use super::rows::{GiftCodeRow, GIFT_CODE_COLUMNS};
use crate::{DatabasePool, GiftCodeRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redeem_core::RedeemResult;
use redeem_domain::{GiftCode, NewGiftCode};
use std::sync::Arc;
use tracing::debug;

/// Postgres gift code repository.
#[derive(Clone)]
pub struct PgGiftCodeRepository {
    pool: Arc<DatabasePool>,
}

impl PgGiftCodeRepository {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }

    async fn fetch_list(&self, sql: &str, at: Option<DateTime<Utc>>) -> RedeemResult<Vec<GiftCode>> {
        let mut query = sqlx::query_as::<_, GiftCodeRow>(sql);
        if let Some(at) = at {
            query = query.bind(at);
        }
        let rows = query.fetch_all(self.pool.inner()).await?;
        Ok(rows.into_iter().map(GiftCode::from).collect())
    }
}

#[async_trait]
impl GiftCodeRepository for PgGiftCodeRepository {
    async fn create(&self, gift_code: &NewGiftCode) -> RedeemResult<GiftCode> {
        debug!("Creating gift code: {}", gift_code.code);

        let row = sqlx::query_as::<_, GiftCodeRow>(&format!(
            r#"
            INSERT INTO gift_charges (code, validity_period_start, validity_period_end,
                                      amount, max_usage_count)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {GIFT_CODE_COLUMNS}
            "#
        ))
        .bind(&gift_code.code)
        .bind(gift_code.window.start)
        .bind(gift_code.window.end)
        .bind(gift_code.amount)
        .bind(gift_code.max_usage_count)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> RedeemResult<Option<GiftCode>> {
        debug!("Finding gift code by id: {}", id);

        let row = sqlx::query_as::<_, GiftCodeRow>(&format!(
            "SELECT {GIFT_CODE_COLUMNS} FROM gift_charges WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(GiftCode::from))
    }

    async fn find_active_by_code(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> RedeemResult<Option<GiftCode>> {
        debug!("Finding active gift code: {}", code);

        let row = sqlx::query_as::<_, GiftCodeRow>(&format!(
            r#"
            SELECT {GIFT_CODE_COLUMNS}
            FROM gift_charges
            WHERE code = $1
              AND validity_period_start <= $2
              AND $2 < validity_period_end
            "#
        ))
        .bind(code)
        .bind(at)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(GiftCode::from))
    }

    async fn find_all(&self) -> RedeemResult<Vec<GiftCode>> {
        self.fetch_list(
            &format!("SELECT {GIFT_CODE_COLUMNS} FROM gift_charges ORDER BY id"),
            None,
        )
        .await
    }

    async fn find_valid(&self, at: DateTime<Utc>) -> RedeemResult<Vec<GiftCode>> {
        self.fetch_list(
            &format!(
                r#"
                SELECT {GIFT_CODE_COLUMNS}
                FROM gift_charges
                WHERE validity_period_start <= $1 AND $1 < validity_period_end
                ORDER BY id
                "#
            ),
            Some(at),
        )
        .await
    }

    async fn find_invalid(&self, at: DateTime<Utc>) -> RedeemResult<Vec<GiftCode>> {
        self.fetch_list(
            &format!(
                r#"
                SELECT {GIFT_CODE_COLUMNS}
                FROM gift_charges
                WHERE NOT (validity_period_start <= $1 AND $1 < validity_period_end)
                ORDER BY id
                "#
            ),
            Some(at),
        )
        .await
    }
}
