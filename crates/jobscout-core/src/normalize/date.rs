//! Posted-date interpretation.
//!
//! Sites publish absolute dates, ISO timestamps and relative phrases
//! ("3 days ago", "30+ days ago", "сегодня"). Everything recognised is
//! rendered as `DD.MM.YYYY` against a caller-supplied reference time.

use std::sync::LazyLock;

use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime, TimeDelta};
use regex::Regex;

use crate::models::PLACEHOLDER;

const OUTPUT_FORMAT: &str = "%d.%m.%Y";

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("valid regex"));
static TODAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"just posted|today|сегодня|только что").expect("valid regex"));
static YESTERDAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"yesterday|вчера").expect("valid regex"));
static DAYS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(?:days?|d)\s*ago").expect("valid regex"));
static HOURS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(?:hours?|hr|h)\s*ago").expect("valid regex"));
static WEEKS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(?:weeks?|w)\s*ago").expect("valid regex"));
static MONTHS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(?:months?|mo)\s*ago").expect("valid regex"));
static CAPPED_DAYS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"30\+\s*days?\s*ago").expect("valid regex"));

/// Absolute formats tried when nothing else matched.
const DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Render a raw posted-date string as `DD.MM.YYYY`.
///
/// Empty input renders as the placeholder; input that matches nothing is
/// returned unchanged.
pub fn format_posted_date(raw: &str, now: NaiveDateTime) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PLACEHOLDER.to_string();
    }
    match parse_posted_date(trimmed, now) {
        Some(date) => date.format(OUTPUT_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// Resolve a raw posted-date string to a calendar date.
pub fn parse_posted_date(raw: &str, now: NaiveDateTime) -> Option<NaiveDate> {
    let s = raw.trim().to_lowercase();
    let today = now.date();

    if let Some(caps) = ISO_DATE.captures(&s) {
        let (y, m, d) = (
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            return Some(date);
        }
    }
    if TODAY.is_match(&s) {
        return Some(today);
    }
    if YESTERDAY.is_match(&s) {
        return today.checked_sub_days(Days::new(1));
    }
    if CAPPED_DAYS_AGO.is_match(&s) {
        return today.checked_sub_days(Days::new(30));
    }
    if let Some(n) = captured_number(&DAYS_AGO, &s) {
        return today.checked_sub_days(Days::new(n));
    }
    if let Some(n) = captured_number(&HOURS_AGO, &s) {
        let delta = TimeDelta::try_hours(i64::try_from(n).ok()?)?;
        return now.checked_sub_signed(delta).map(|t| t.date());
    }
    if let Some(n) = captured_number(&WEEKS_AGO, &s) {
        return today.checked_sub_days(Days::new(n.checked_mul(7)?));
    }
    if let Some(n) = captured_number(&MONTHS_AGO, &s) {
        return today.checked_sub_months(Months::new(u32::try_from(n).ok()?));
    }

    parse_absolute(raw.trim())
}

fn captured_number(re: &Regex, s: &str) -> Option<u64> {
    re.captures(s).and_then(|caps| caps[1].parse().ok())
}

fn parse_absolute(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn fmt(raw: &str) -> String {
        format_posted_date(raw, reference())
    }

    #[test]
    fn iso_dates() {
        assert_eq!(fmt("2024-03-07"), "07.03.2024");
        assert_eq!(fmt("2024-03-07T09:15:00Z"), "07.03.2024");
        assert_eq!(fmt("Posted 2023-12-31"), "31.12.2023");
    }

    #[test]
    fn today_and_yesterday_in_both_languages() {
        assert_eq!(fmt("Today"), "10.03.2024");
        assert_eq!(fmt("Just posted"), "10.03.2024");
        assert_eq!(fmt("Сегодня"), "10.03.2024");
        assert_eq!(fmt("yesterday"), "09.03.2024");
        assert_eq!(fmt("вчера"), "09.03.2024");
    }

    #[test]
    fn relative_phrases() {
        assert_eq!(fmt("3 days ago"), "07.03.2024");
        assert_eq!(fmt("Posted 1 day ago"), "09.03.2024");
        assert_eq!(fmt("5 hours ago"), "10.03.2024");
        assert_eq!(fmt("13 hours ago"), "09.03.2024");
        assert_eq!(fmt("2 weeks ago"), "25.02.2024");
        assert_eq!(fmt("1 month ago"), "10.02.2024");
        assert_eq!(fmt("2d ago"), "08.03.2024");
    }

    #[test]
    fn capped_thirty_days() {
        assert_eq!(fmt("30+ days ago"), "09.02.2024");
        assert_eq!(fmt("Active 30+ days ago"), "09.02.2024");
    }

    #[test]
    fn generic_absolute_formats() {
        assert_eq!(fmt("March 5, 2024"), "05.03.2024");
        assert_eq!(fmt("Mar 5, 2024"), "05.03.2024");
        assert_eq!(fmt("Tue, 05 Mar 2024 10:00:00 +0000"), "05.03.2024");
    }

    #[test]
    fn unknown_passes_through_and_empty_is_placeholder() {
        assert_eq!(fmt("Hiring ongoing"), "Hiring ongoing");
        assert_eq!(fmt(""), PLACEHOLDER);
        assert_eq!(fmt("   "), PLACEHOLDER);
    }
}
