//! Raw record to normalized record.
//!
//! Each step is a pure function over plain text so it can be tested
//! without fetching anything.

pub mod date;
pub mod infer;
pub mod salary;
pub mod url;

use chrono::NaiveDateTime;

use crate::models::{NormalizedJob, PLACEHOLDER, PayInterval, RawJob};

pub use self::date::{format_posted_date, parse_posted_date};
pub use self::infer::{infer_job_type, infer_remote, remote_label, truncate_description};
pub use self::salary::{ParsedSalary, format_salary, parse_salary};
pub use self::url::canonical_url;

/// Normalize one raw record against the reference time `now`.
pub fn normalize_job(raw: &RawJob, now: NaiveDateTime) -> NormalizedJob {
    let job_url = canonical_url(&raw.job_url);
    let job_url_raw = match raw.job_url.trim() {
        "" => job_url.clone(),
        s => s.to_string(),
    };
    let description = truncate_description(&raw.description);

    let mut min_amount = raw.min_amount.map(|v| v.trunc() as i64);
    let mut max_amount = raw.max_amount.map(|v| v.trunc() as i64);
    let mut currency = non_empty(raw.currency.as_deref()).map(str::to_uppercase);
    let mut interval = raw
        .interval
        .as_deref()
        .and_then(|s| s.parse::<PayInterval>().ok());

    if min_amount.is_none() && max_amount.is_none() {
        if let Some(parsed) = salary_candidate(raw, &description).map(parse_salary) {
            if parsed.has_amount() {
                min_amount = parsed.min;
                max_amount = parsed.max;
                currency = currency.or(parsed.currency);
                interval = interval.or(Some(parsed.interval));
            }
        }
    }
    let salary = format_salary(min_amount, max_amount, currency.as_deref(), interval);

    let text = infer::inference_text(&raw.title, &raw.location, &description);
    let remote_bool = raw.is_remote.or_else(|| infer_remote(&text));
    let job_type = raw
        .job_type
        .as_deref()
        .and_then(|s| s.parse().ok())
        .or_else(|| infer_job_type(&text));

    NormalizedJob {
        title: or_placeholder(&raw.title),
        company: or_placeholder(&raw.company),
        location: or_placeholder(&raw.location),
        site: or_placeholder(&raw.site),
        date_posted: format_posted_date(&raw.date_posted, now),
        job_type,
        remote: remote_label(remote_bool).to_string(),
        remote_bool,
        salary,
        min_amount,
        max_amount,
        currency,
        interval,
        job_url,
        job_url_raw,
        description,
    }
}

/// Salary text when the source gave one; otherwise the description, but
/// only when it looks like it quotes pay.
fn salary_candidate<'a>(raw: &'a RawJob, description: &'a str) -> Option<&'a str> {
    if let Some(text) = non_empty(raw.salary_text.as_deref()) {
        return Some(text);
    }
    if !description.is_empty() && salary::has_pay_marker(description) {
        return Some(description);
    }
    None
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn or_placeholder(s: &str) -> String {
    match s.trim() {
        "" => PLACEHOLDER.to_string(),
        s => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::JobType;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn raw() -> RawJob {
        RawJob {
            title: "Rust Engineer".into(),
            company: "Acme".into(),
            location: "Berlin".into(),
            site: "indeed".into(),
            job_url: "https://www.Indeed.com/viewjob?jk=42".into(),
            date_posted: "3 days ago".into(),
            ..RawJob::default()
        }
    }

    #[test]
    fn canonicalizes_and_formats() {
        let job = normalize_job(&raw(), now());
        assert_eq!(job.job_url, "https://indeed.com/viewjob");
        assert_eq!(job.job_url_raw, "https://www.Indeed.com/viewjob?jk=42");
        assert_eq!(job.date_posted, "07.03.2024");
        assert_eq!(job.salary, PLACEHOLDER);
        assert_eq!(job.remote, PLACEHOLDER);
        assert_eq!(job.remote_bool, None);
        assert_eq!(job.job_type, None);
    }

    #[test]
    fn missing_fields_become_placeholders() {
        let job = normalize_job(&RawJob::default(), now());
        assert_eq!(job.title, PLACEHOLDER);
        assert_eq!(job.company, PLACEHOLDER);
        assert_eq!(job.site, PLACEHOLDER);
        assert_eq!(job.date_posted, PLACEHOLDER);
        assert_eq!(job.job_url, "");
        assert_eq!(job.job_url_raw, "");
    }

    #[test]
    fn structured_amounts_win_over_text() {
        let mut r = raw();
        r.min_amount = Some(60_000.9);
        r.max_amount = Some(80_000.0);
        r.currency = Some("usd".into());
        r.interval = Some("yearly".into());
        r.salary_text = Some("€1 per hour".into());
        let job = normalize_job(&r, now());
        assert_eq!(job.min_amount, Some(60_000));
        assert_eq!(job.max_amount, Some(80_000));
        assert_eq!(job.currency.as_deref(), Some("USD"));
        assert_eq!(job.salary, "60000–80000 USD/yearly");
    }

    #[test]
    fn salary_text_is_parsed() {
        let mut r = raw();
        r.salary_text = Some("$25 - $30 an hour".into());
        let job = normalize_job(&r, now());
        assert_eq!(job.min_amount, Some(25));
        assert_eq!(job.max_amount, Some(30));
        assert_eq!(job.interval, Some(PayInterval::Hourly));
        assert_eq!(job.salary, "25–30 USD/hourly");
    }

    #[test]
    fn description_needs_pay_marker() {
        let mut r = raw();
        r.description = "3+ years of experience, team of 12".into();
        assert_eq!(normalize_job(&r, now()).salary, PLACEHOLDER);

        r.description = "Pays £40k to £55k, hybrid in London".into();
        let job = normalize_job(&r, now());
        assert_eq!(job.salary, "40000–55000 GBP/yearly");
        assert_eq!(job.remote_bool, Some(false));
        assert_eq!(job.remote, "Office/Hybrid");
    }

    #[test]
    fn lakh_salary_read_from_description() {
        let mut r = raw();
        r.site = "naukri".into();
        r.description = "Salary 10-15 LPA, Bangalore".into();
        let job = normalize_job(&r, now());
        assert_eq!(job.min_amount, Some(1_000_000));
        assert_eq!(job.max_amount, Some(1_500_000));
        assert_eq!(job.interval, Some(PayInterval::Yearly));
        assert_eq!(job.currency, None);
    }

    #[test]
    fn explicit_flags_beat_inference() {
        let mut r = raw();
        r.title = "Remote contract engineer".into();
        r.is_remote = Some(false);
        r.job_type = Some("Full-time".into());
        let job = normalize_job(&r, now());
        assert_eq!(job.remote_bool, Some(false));
        assert_eq!(job.job_type, Some(JobType::FullTime));
    }

    #[test]
    fn flags_inferred_from_text() {
        let mut r = raw();
        r.title = "Data Intern".into();
        r.location = "Remote".into();
        let job = normalize_job(&r, now());
        assert_eq!(job.remote_bool, Some(true));
        assert_eq!(job.remote, "Remote");
        assert_eq!(job.job_type, Some(JobType::Internship));
    }
}
