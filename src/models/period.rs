//! Tip period model.
//!
//! The period is carried through the pipeline for reporting only; no
//! calculation depends on it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The date range a tip pool was collected over.
///
/// # Example
///
/// ```
/// use tip_engine::models::Period;
/// use chrono::NaiveDate;
///
/// let period = Period {
///     start_date: NaiveDate::from_ymd_opt(2026, 10, 5).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 10, 10).unwrap()));
/// assert_eq!(period.days(), 14);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// The first day of the period (inclusive).
    pub start_date: NaiveDate,
    /// The last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl Period {
    /// Checks if a given date falls within this period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of calendar days in the period, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
