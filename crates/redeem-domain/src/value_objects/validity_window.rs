//! Validity window value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Half-open time interval `[start, end)` during which a gift code is redeemable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ValidityWindow {
    /// Creates a window; `None` when `start` is not strictly before `end`.
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Returns true if `at` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    /// Returns true if the window has closed by `now`.
    #[must_use]
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now >= self.end
    }

    /// Time left until the window closes, clamped to zero once it has ended.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.end - now).to_std().unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_or_inverted_window() {
        assert!(ValidityWindow::new(at(10), at(12)).is_some());
        assert!(ValidityWindow::new(at(12), at(12)).is_none());
        assert!(ValidityWindow::new(at(12), at(10)).is_none());
    }

    #[test]
    fn test_contains_is_half_open() {
        let window = ValidityWindow::new(at(10), at(12)).unwrap();
        assert!(!window.contains(at(9)));
        assert!(window.contains(at(10)));
        assert!(window.contains(at(11)));
        assert!(!window.contains(at(12)));
    }

    #[test]
    fn test_remaining_is_clamped() {
        let window = ValidityWindow::new(at(10), at(12)).unwrap();
        assert_eq!(window.remaining(at(11)), Duration::from_secs(3600));
        assert_eq!(window.remaining(at(12)), Duration::ZERO);
        assert_eq!(window.remaining(at(13)), Duration::ZERO);
        assert!(window.has_ended(at(12)));
        assert!(!window.has_ended(at(11)));
    }
}
