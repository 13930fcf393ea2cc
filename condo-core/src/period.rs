//! Period keys.
//!
//! The scanner treats periods as opaque strings. These helpers only exist
//! for callers that derive a key from a date or want to show one to a user.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<year>\d{4})[-_](?P<month>\d{2})$").expect("valid regex"));

/// `YYYY_MM` key for the month containing `date`
pub fn period_from_date(date: NaiveDate) -> String {
    date.format("%Y_%m").to_string()
}

/// Render `2026_01` (or `2026-01`) as `01/2026`.
/// Anything that is not year-month shaped is returned unchanged.
pub fn display_period(period: &str) -> String {
    match PERIOD_RE.captures(period.trim()) {
        Some(caps) => format!("{}/{}", &caps["month"], &caps["year"]),
        None => period.to_string(),
    }
}

/// Distinct periods in ascending (lexicographic) order
pub fn sort_periods<'a>(periods: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = periods.into_iter().map(str::to_string).collect();
    out.sort();
    out.dedup();
    out
}
