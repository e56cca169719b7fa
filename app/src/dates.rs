//! Local-calendar date helpers.
//!
//! Every date string in the system comes from [`local_date_key`]: the
//! store query boundaries and the per-day bucket keys must be produced
//! by the same formatting, otherwise entries silently land in the wrong
//! bucket or get dropped at the range edges. No call site formats a
//! date any other way, and nothing here goes through UTC.

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

/// Format a local calendar day as a zero-padded "YYYY-MM-DD" key.
pub fn local_date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a "YYYY-MM-DD" key back into a calendar day.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// The viewer's current local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Inclusive bounds of the week containing `day`: the most recent
/// Sunday on or before it through the following Saturday. Always spans
/// exactly 7 days regardless of which weekday `day` is.
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let back = day.weekday().num_days_from_sunday() as i64;
    let start = day - Duration::days(back);
    (start, start + Duration::days(6))
}

/// Inclusive bounds of the month containing `day`: the 1st through the
/// last calendar day (the day before the 1st of the next month).
pub fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let (year, month) = (day.year(), day.month());
    let start = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .pred_opt()
        .unwrap();
    (start, end)
}

/// Every calendar day in the inclusive range, ascending. This dense
/// enumeration is what lets days with no entries still appear in the
/// period views.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

/// Short weekday label for the summary cards.
pub fn day_of_week_label(day: NaiveDate) -> &'static str {
    match day.weekday() {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}
