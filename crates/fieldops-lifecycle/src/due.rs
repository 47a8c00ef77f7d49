//! DueDateBucketer - due-date buckets and the tools-tracking calendar window.
//!
//! Dates are calendar dates only. The tracking dashboard applies two stages:
//! an item must first fall inside the legacy window (15th of the previous
//! month through the 15th of the next month) and only then is bucketed.

use chrono::{Datelike, Months, NaiveDate};
use fieldops_models::Bucket;
use serde::{Deserialize, Serialize};

/// Day of month anchoring the legacy window.
const WINDOW_ANCHOR_DAY: u32 = 15;

/// Whole calendar days from `reference` to `due` (negative when overdue).
pub fn days_until(due: NaiveDate, reference: NaiveDate) -> i64 {
    (due - reference).num_days()
}

/// Classifies `due` relative to `reference`.
///
/// Each bucket's upper edge is inclusive: 15 days out is `Due15`, 16 is `Due30`.
pub fn bucket_of(due: NaiveDate, reference: NaiveDate) -> Bucket {
    match days_until(due, reference) {
        d if d < 0 => Bucket::OverDue,
        0..=15 => Bucket::Due15,
        16..=30 => Bucket::Due30,
        31..=45 => Bucket::Due45,
        46..=60 => Bucket::Due60,
        _ => Bucket::NotDue,
    }
}

/// Inclusive date range scoping the tools-tracking calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl LegacyWindow {
    /// Returns true if `date` lies within `[start, end]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days from start to end.
    pub fn width_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Computes the window for `reference`: the 15th of the preceding month
/// through the 15th of the following month.
///
/// At the edges of the representable calendar the window is clipped to
/// `NaiveDate::MIN` / `NaiveDate::MAX`.
pub fn legacy_window(reference: NaiveDate) -> LegacyWindow {
    let anchor = NaiveDate::from_ymd_opt(reference.year(), reference.month(), WINDOW_ANCHOR_DAY);

    let start = anchor
        .and_then(|a| a.checked_sub_months(Months::new(1)))
        .unwrap_or(NaiveDate::MIN);
    let end = anchor
        .and_then(|a| a.checked_add_months(Months::new(1)))
        .unwrap_or(NaiveDate::MAX);

    LegacyWindow { start, end }
}

/// Two-stage classification used by the tracking dashboard.
///
/// Returns `None` for undated items and for items outside the legacy
/// window, whatever bucket they would otherwise fall into.
pub fn tracking_bucket(due: Option<NaiveDate>, reference: NaiveDate) -> Option<Bucket> {
    let due = due?;
    if !legacy_window(reference).contains(due) {
        return None;
    }
    Some(bucket_of(due, reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bucket_examples() {
        let reference = date(2024, 3, 20);
        assert_eq!(bucket_of(date(2024, 4, 2), reference), Bucket::Due15);
        assert_eq!(bucket_of(date(2024, 3, 10), reference), Bucket::OverDue);
    }

    #[test]
    fn test_bucket_boundaries_inclusive_at_upper_edge() {
        let reference = date(2024, 1, 1);
        let at = |days: u64| bucket_of(reference + chrono::Days::new(days), reference);

        assert_eq!(bucket_of(date(2023, 12, 31), reference), Bucket::OverDue);
        assert_eq!(at(0), Bucket::Due15);
        assert_eq!(at(15), Bucket::Due15);
        assert_eq!(at(16), Bucket::Due30);
        assert_eq!(at(30), Bucket::Due30);
        assert_eq!(at(31), Bucket::Due45);
        assert_eq!(at(45), Bucket::Due45);
        assert_eq!(at(46), Bucket::Due60);
        assert_eq!(at(60), Bucket::Due60);
        assert_eq!(at(61), Bucket::NotDue);
    }

    #[test]
    fn test_bucket_monotonic() {
        let reference = date(2024, 2, 10);
        let mut previous = Bucket::OverDue;
        for days in 0..120 {
            let bucket = bucket_of(reference + chrono::Days::new(days), reference);
            assert!(previous <= bucket, "day {}", days);
            previous = bucket;
        }
    }

    #[test]
    fn test_legacy_window_example() {
        let window = legacy_window(date(2024, 3, 20));
        assert_eq!(window.start, date(2024, 2, 15));
        assert_eq!(window.end, date(2024, 4, 15));
    }

    #[test]
    fn test_legacy_window_wraps_years() {
        let january = legacy_window(date(2024, 1, 3));
        assert_eq!(january.start, date(2023, 12, 15));
        assert_eq!(january.end, date(2024, 2, 15));

        let december = legacy_window(date(2023, 12, 31));
        assert_eq!(december.start, date(2023, 11, 15));
        assert_eq!(december.end, date(2024, 1, 15));
    }

    #[test]
    fn test_legacy_window_contains_reference_and_width() {
        let mut reference = date(2023, 1, 1);
        while reference < date(2025, 1, 1) {
            let window = legacy_window(reference);
            assert!(window.start <= reference && reference <= window.end);
            assert!((59..=62).contains(&window.width_days()), "{}", reference);
            reference = reference.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_tracking_bucket_two_stage() {
        let reference = date(2024, 3, 20);

        // Inside the window.
        assert_eq!(tracking_bucket(Some(date(2024, 4, 2)), reference), Some(Bucket::Due15));
        assert_eq!(tracking_bucket(Some(date(2024, 2, 15)), reference), Some(Bucket::OverDue));
        assert_eq!(tracking_bucket(Some(date(2024, 4, 15)), reference), Some(Bucket::Due30));

        // Overdue but before the window start.
        assert_eq!(tracking_bucket(Some(date(2024, 2, 14)), reference), None);
        // Would be Due30 but after the window end.
        assert_eq!(bucket_of(date(2024, 4, 16), reference), Bucket::Due30);
        assert_eq!(tracking_bucket(Some(date(2024, 4, 16)), reference), None);

        assert_eq!(tracking_bucket(None, reference), None);
    }
}
