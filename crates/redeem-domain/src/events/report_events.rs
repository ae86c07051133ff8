//! Usage report domain events.

use crate::UsageReport;
use chrono::{DateTime, Utc};
use redeem_core::{DomainEvent, RedeemResult};
use serde::{Deserialize, Serialize};

/// Subject under which newly created reports are announced.
pub const REPORT_CREATED_SUBJECT: &str = "report:create";

/// Event emitted when a usage report is created outside a redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCreated {
    #[serde(flatten)]
    pub report: UsageReport,
}

impl ReportCreated {
    #[must_use]
    pub const fn new(report: UsageReport) -> Self {
        Self { report }
    }
}

impl DomainEvent for ReportCreated {
    fn subject(&self) -> &'static str {
        REPORT_CREATED_SUBJECT
    }

    fn aggregate_id(&self) -> String {
        self.report.id.to_string()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.report.created_at
    }

    fn to_json(&self) -> RedeemResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
