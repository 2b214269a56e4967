//! Calendar arithmetic — quarter-end resolution for the snapshot grid.
//!
//! All reporting dates in the pipeline are calendar quarter ends
//! (Mar 31, Jun 30, Sep 30, Dec 31). Month arithmetic elsewhere goes
//! through chrono's `Months`, which clamps to month-end where needed.

use chrono::{Datelike, NaiveDate};

/// The quarter-end date for (year, quarter), quarter in 1..=4.
pub fn quarter_end(year: i32, quarter: u32) -> NaiveDate {
    let (month, day) = match quarter {
        1 => (3, 31),
        2 => (6, 30),
        3 => (9, 30),
        4 => (12, 31),
        _ => panic!("quarter must be 1..=4, got {quarter}"),
    };
    NaiveDate::from_ymd_opt(year, month, day).expect("quarter-end date is always valid")
}

/// The most recent quarter end on or before `as_of`.
pub fn most_recent_quarter_end(as_of: NaiveDate) -> NaiveDate {
    let quarter = (as_of.month() - 1) / 3 + 1;
    let candidate = quarter_end(as_of.year(), quarter);
    if candidate <= as_of {
        candidate
    } else if quarter == 1 {
        quarter_end(as_of.year() - 1, 4)
    } else {
        quarter_end(as_of.year(), quarter - 1)
    }
}

/// The `count` most recent quarter ends on or before `as_of`,
/// ordered oldest to newest.
pub fn recent_quarter_ends(as_of: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count);
    let mut current = most_recent_quarter_end(as_of);
    for _ in 0..count {
        dates.push(current);
        let quarter = (current.month() - 1) / 3 + 1;
        current = if quarter == 1 {
            quarter_end(current.year() - 1, 4)
        } else {
            quarter_end(current.year(), quarter - 1)
        };
    }
    dates.reverse();
    dates
}

/// Display label, e.g. "2026Q2".
pub fn quarter_label(date: NaiveDate) -> String {
    format!("{}Q{}", date.year(), (date.month() - 1) / 3 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn most_recent_handles_mid_quarter() {
        assert_eq!(most_recent_quarter_end(d(2026, 8, 29)), d(2026, 6, 30));
        assert_eq!(most_recent_quarter_end(d(2026, 2, 1)), d(2025, 12, 31));
    }

    #[test]
    fn most_recent_handles_exact_quarter_end() {
        assert_eq!(most_recent_quarter_end(d(2026, 6, 30)), d(2026, 6, 30));
        assert_eq!(most_recent_quarter_end(d(2025, 12, 31)), d(2025, 12, 31));
    }

    #[test]
    fn recent_quarter_ends_are_ordered_and_spaced() {
        let quarters = recent_quarter_ends(d(2026, 8, 29), 20);
        assert_eq!(quarters.len(), 20);
        assert_eq!(*quarters.last().unwrap(), d(2026, 6, 30));
        assert_eq!(quarters[0], d(2021, 9, 30));
        for pair in quarters.windows(2) {
            assert!(pair[0] < pair[1], "quarters out of order");
        }
    }

    #[test]
    fn labels_render_year_and_quarter() {
        assert_eq!(quarter_label(d(2026, 6, 30)), "2026Q2");
        assert_eq!(quarter_label(d(2025, 12, 31)), "2025Q4");
    }
}
