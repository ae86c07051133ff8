//! In-memory fakes shared by the service tests.

use crate::cache::CacheInterface;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use redeem_core::{EventPublisher, RedeemError, RedeemResult};
use redeem_domain::{GiftCode, NewGiftCode, NewUsageReport, UsageReport};
use redeem_repository::{
    GiftCodeRepository, TransactionManager, UsageLedger, UsageReportRepository,
};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn gift_code_with_window(
    code: &str,
    amount: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> GiftCode {
    GiftCode {
        id: 1,
        code: code.to_string(),
        validity_period_start: start,
        validity_period_end: end,
        amount,
        max_usage_count: 100,
        created_at: start,
        updated_at: start,
    }
}

pub fn active_gift_code(code: &str, amount: i64) -> GiftCode {
    let now = Utc::now();
    gift_code_with_window(
        code,
        amount,
        now - ChronoDuration::hours(1),
        now + ChronoDuration::hours(1),
    )
}

pub fn usage_report(id: i64, mobile: &str, gift_code: &str, amount: i64) -> UsageReport {
    let now = Utc::now();
    UsageReport {
        id,
        gift_code: gift_code.to_string(),
        mobile: mobile.to_string(),
        charge_amount: amount,
        report_time: now,
        created_at: now,
    }
}

/// Gift code store counting active-code lookups.
#[derive(Default)]
pub struct FakeGiftCodeRepository {
    codes: Mutex<Vec<GiftCode>>,
    active_lookups: AtomicUsize,
    id_lookups: AtomicUsize,
}

impl FakeGiftCodeRepository {
    pub fn new(codes: Vec<GiftCode>) -> Self {
        Self {
            codes: Mutex::new(codes),
            ..Self::default()
        }
    }

    pub fn with_active(code: &str, amount: i64) -> Self {
        Self::new(vec![active_gift_code(code, amount)])
    }

    pub fn active_lookups(&self) -> usize {
        self.active_lookups.load(Ordering::SeqCst)
    }

    pub fn id_lookups(&self) -> usize {
        self.id_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GiftCodeRepository for FakeGiftCodeRepository {
    async fn create(&self, gift_code: &NewGiftCode) -> RedeemResult<GiftCode> {
        let mut codes = self.codes.lock().unwrap();
        if codes.iter().any(|c| c.code == gift_code.code) {
            return Err(RedeemError::Conflict(format!("code {} exists", gift_code.code)));
        }
        let now = Utc::now();
        let created = GiftCode {
            id: codes.len() as i64 + 1,
            code: gift_code.code.clone(),
            validity_period_start: gift_code.window.start,
            validity_period_end: gift_code.window.end,
            amount: gift_code.amount,
            max_usage_count: gift_code.max_usage_count,
            created_at: now,
            updated_at: now,
        };
        codes.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> RedeemResult<Option<GiftCode>> {
        self.id_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.codes.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_active_by_code(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> RedeemResult<Option<GiftCode>> {
        self.active_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.code == code && c.is_redeemable_at(at))
            .cloned())
    }

    async fn find_all(&self) -> RedeemResult<Vec<GiftCode>> {
        Ok(self.codes.lock().unwrap().clone())
    }

    async fn find_valid(&self, at: DateTime<Utc>) -> RedeemResult<Vec<GiftCode>> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_redeemable_at(at))
            .cloned()
            .collect())
    }

    async fn find_invalid(&self, at: DateTime<Utc>) -> RedeemResult<Vec<GiftCode>> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| !c.is_redeemable_at(at))
            .cloned()
            .collect())
    }
}

/// Open transaction of [`FakeLedger`]: writes stay private until commit.
#[derive(Debug, Default)]
pub struct FakeTx {
    pending: Vec<UsageReport>,
}

/// Usage ledger and report store sharing one committed report list.
#[derive(Default)]
pub struct FakeLedger {
    committed: Mutex<Vec<UsageReport>>,
    next_id: AtomicI64,
    pub begins: AtomicUsize,
    pub commits: AtomicUsize,
    pub rollbacks: AtomicUsize,
    pub usage_lookups: AtomicUsize,
    pub fail_find: AtomicBool,
    pub fail_record: AtomicBool,
    pub fail_commit: AtomicBool,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reports(reports: Vec<UsageReport>) -> Self {
        let ledger = Self::new();
        ledger
            .next_id
            .store(reports.iter().map(|r| r.id).max().unwrap_or(0), Ordering::SeqCst);
        *ledger.committed.lock().unwrap() = reports;
        ledger
    }

    pub fn reports(&self) -> Vec<UsageReport> {
        self.committed.lock().unwrap().clone()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn next_report(&self, report: &NewUsageReport) -> UsageReport {
        UsageReport {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            gift_code: report.gift_code.clone(),
            mobile: report.mobile.clone(),
            charge_amount: report.charge_amount,
            report_time: report.report_time,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
impl TransactionManager for FakeLedger {
    type Tx = FakeTx;

    async fn begin(&self) -> RedeemResult<FakeTx> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(FakeTx::default())
    }

    async fn commit(&self, tx: FakeTx) -> RedeemResult<()> {
        if self.fail_commit.load(Ordering::SeqCst) {
            return Err(RedeemError::persistence("commit failed"));
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.committed.lock().unwrap().extend(tx.pending);
        Ok(())
    }

    async fn rollback(&self, _tx: FakeTx) -> RedeemResult<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl UsageLedger for FakeLedger {
    async fn find_usage(
        &self,
        tx: &mut FakeTx,
        mobile: &str,
        gift_code: &str,
    ) -> RedeemResult<Option<UsageReport>> {
        self.usage_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_find.load(Ordering::SeqCst) {
            return Err(RedeemError::persistence("select failed"));
        }
        let matches = |r: &&UsageReport| r.mobile == mobile && r.gift_code == gift_code;
        if let Some(found) = tx.pending.iter().find(matches) {
            return Ok(Some(found.clone()));
        }
        Ok(self.committed.lock().unwrap().iter().find(matches).cloned())
    }

    async fn record_usage(
        &self,
        tx: &mut FakeTx,
        report: &NewUsageReport,
    ) -> RedeemResult<UsageReport> {
        if self.fail_record.load(Ordering::SeqCst) {
            return Err(RedeemError::persistence("insert failed"));
        }
        let duplicate = self
            .committed
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.mobile == report.mobile && r.gift_code == report.gift_code);
        if duplicate {
            return Err(RedeemError::Conflict("duplicate report".to_string()));
        }
        let created = self.next_report(report);
        tx.pending.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl UsageReportRepository for FakeLedger {
    async fn create(&self, report: &NewUsageReport) -> RedeemResult<UsageReport> {
        let created = self.next_report(report);
        self.committed.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_by_gift_code(&self, gift_code: &str) -> RedeemResult<Vec<UsageReport>> {
        self.usage_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .committed
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.gift_code == gift_code)
            .cloned()
            .collect())
    }

    async fn find_by_mobile(&self, mobile: &str) -> RedeemResult<Vec<UsageReport>> {
        self.usage_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .committed
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.mobile == mobile)
            .cloned()
            .collect())
    }

    async fn count_by_gift_code(&self, gift_code: &str) -> RedeemResult<i64> {
        self.usage_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .committed
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.gift_code == gift_code)
            .count() as i64)
    }
}

/// Cache whose every operation fails.
pub struct FailingCache;

#[async_trait]
impl CacheInterface for FailingCache {
    async fn get_raw(&self, _key: &str) -> RedeemResult<Option<String>> {
        Err(RedeemError::Cache("connection refused".to_string()))
    }

    async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> RedeemResult<()> {
        Err(RedeemError::Cache("connection refused".to_string()))
    }

    async fn set_if_absent(&self, _key: &str, _value: &str, _ttl: Duration) -> RedeemResult<bool> {
        Err(RedeemError::Cache("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> RedeemResult<bool> {
        Err(RedeemError::Cache("connection refused".to_string()))
    }

    async fn exists(&self, _key: &str) -> RedeemResult<bool> {
        Err(RedeemError::Cache("connection refused".to_string()))
    }
}

/// Publisher that records every event and can be told to fail.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<(String, serde_json::Value)>>,
    pub fail: AtomicBool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let publisher = Self::new();
        publisher.fail.store(true, Ordering::SeqCst);
        publisher
    }

    pub fn events(&self) -> Vec<(String, serde_json::Value)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, subject: &str, payload: &[u8]) -> RedeemResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RedeemError::publish(subject, "channel unavailable"));
        }
        let json = serde_json::from_slice(payload)?;
        self.events.lock().unwrap().push((subject.to_string(), json));
        Ok(())
    }
}
