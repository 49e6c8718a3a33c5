//! Free-text salary parsing.
//!
//! Handles US and European digit grouping, `k` thousands and Indian
//! lakh suffixes (`l`, `lac`, `lakh`, `lpa`). Amounts are emitted in the
//! interval they were quoted in; nothing is annualized here.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{PLACEHOLDER, PayInterval};

/// One number with an optional multiplier suffix.
const AMOUNT: &str = r"\d[\d.,]*(?:\s*(?:lakhs?|lacs?|lpa|l|k)\b)?";

static CURRENCY_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"A\$|C\$|[€£$₹]").expect("valid regex"));
static CURRENCY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(USD|EUR|GBP|AUD|CAD|INR|AED)\b").expect("valid regex"));

static HOURLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)per\s*hour|hourly|\bhour\b|/\s*hr\b|\bphr\b").expect("valid regex")
});
static DAILY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)per\s*day|daily|\bday\b|/\s*day").expect("valid regex"));
static WEEKLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)per\s*week|weekly|\bweek\b|/\s*wk").expect("valid regex")
});
static MONTHLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)per\s*month|monthly|\bmonth\b|\bmo\b|/\s*mo").expect("valid regex")
});

static SUFFIXED_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d\s*(?:lakhs?|lacs?|lpa|l|k)\b").expect("valid regex"));
static PAY_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bper\s*(?:hour|day|week|month|year|annum)\b").expect("valid regex")
});

static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)({AMOUNT})\s*(?:-|–|—|\bto\b)\s*(?:[a-z]{{3}}\s*)?(?:A\$|C\$|[€£$₹])?\s*({AMOUNT})"
    ))
    .expect("valid regex")
});
static SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)({AMOUNT})")).expect("valid regex"));

static EURO_GROUPING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d{3}(?:\.\d{3})*").expect("valid regex"));
static DECIMAL_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d{1,2}$").expect("valid regex"));

/// Amounts, currency and interval read from a salary string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSalary {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub currency: Option<String>,
    pub interval: PayInterval,
}

impl ParsedSalary {
    pub fn has_amount(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// Parse a free-text salary such as `"$50,000 - $70,000 a year"`.
///
/// The interval defaults to yearly when no keyword is present.
pub fn parse_salary(text: &str) -> ParsedSalary {
    let t = text.trim();
    let (min, max) = match RANGE.captures(t) {
        Some(caps) => {
            // "10-15 LPA": the upper bound's suffix applies to both ends.
            let low = match (amount_suffix(&caps[1]), amount_suffix(&caps[2])) {
                (None, Some(suffix)) => format!("{}{suffix}", &caps[1]),
                _ => caps[1].to_string(),
            };
            (parse_amount(&low), parse_amount(&caps[2]))
        }
        None => match SINGLE.captures(t) {
            Some(caps) => (parse_amount(&caps[1]), None),
            None => (None, None),
        },
    };

    ParsedSalary {
        min,
        max,
        currency: detect_currency(t),
        interval: detect_interval(t),
    }
}

/// Currency code from a symbol (`$ € £ ₹ A$ C$`) or an explicit ISO code.
pub fn detect_currency(text: &str) -> Option<String> {
    if let Some(m) = CURRENCY_SYMBOL.find(text) {
        let code = match m.as_str() {
            "A$" => "AUD",
            "C$" => "CAD",
            "€" => "EUR",
            "£" => "GBP",
            "₹" => "INR",
            _ => "USD",
        };
        return Some(code.to_string());
    }
    CURRENCY_CODE
        .captures(text)
        .map(|caps| caps[1].to_uppercase())
}

/// Whether free text looks like it quotes pay: a currency marker, an
/// amount with a `k` or lakh suffix, or a `per <period>` phrase.
pub fn has_pay_marker(text: &str) -> bool {
    detect_currency(text).is_some() || SUFFIXED_AMOUNT.is_match(text) || PAY_PERIOD.is_match(text)
}

/// Pay interval by keyword; yearly when nothing matches.
pub fn detect_interval(text: &str) -> PayInterval {
    if HOURLY.is_match(text) {
        PayInterval::Hourly
    } else if DAILY.is_match(text) {
        PayInterval::Daily
    } else if WEEKLY.is_match(text) {
        PayInterval::Weekly
    } else if MONTHLY.is_match(text) {
        PayInterval::Monthly
    } else {
        PayInterval::Yearly
    }
}

/// Normalize one numeric token, applying grouping rules and suffixes.
///
/// Commas are always thousands separators. Dots are thousands separators
/// when they group exactly three digits, unless the token ends in a
/// one- or two-digit decimal tail.
pub fn parse_amount(token: &str) -> Option<i64> {
    let mut v: String = token
        .to_lowercase()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if EURO_GROUPING.is_match(&v) && !DECIMAL_TAIL.is_match(&v) {
        v.retain(|c| c != '.');
    }

    let (number, multiplier) = split_suffix(&v);
    let value: f64 = number.parse().ok()?;
    let amount = value * multiplier;
    if !amount.is_finite() {
        return None;
    }
    Some(amount.trunc() as i64)
}

/// Trailing multiplier suffix of an amount token, if any.
fn amount_suffix(token: &str) -> Option<&str> {
    let suffix = token.trim_end().trim_start_matches(|c: char| !c.is_alphabetic());
    (!suffix.is_empty()).then_some(suffix)
}

fn split_suffix(v: &str) -> (&str, f64) {
    for suffix in ["lakhs", "lakh", "lacs", "lac", "lpa", "l"] {
        if let Some(number) = v.strip_suffix(suffix) {
            return (number, 100_000.0);
        }
    }
    match v.strip_suffix('k') {
        Some(number) => (number, 1_000.0),
        None => (v, 1.0),
    }
}

/// Human-readable salary: `min–max CUR/interval`, a single amount, or the placeholder.
pub fn format_salary(
    min: Option<i64>,
    max: Option<i64>,
    currency: Option<&str>,
    interval: Option<PayInterval>,
) -> String {
    let currency = currency.unwrap_or("");
    let interval = interval.map(|i| i.as_str()).unwrap_or("");
    match (min, max) {
        (Some(lo), Some(hi)) => format!("{lo}–{hi} {currency}/{interval}"),
        (Some(v), None) | (None, Some(v)) => format!("{v} {currency}/{interval}"),
        (None, None) => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn us_range_per_year() {
        let s = parse_salary("$50,000 - $70,000 a year");
        assert_eq!(s.min, Some(50_000));
        assert_eq!(s.max, Some(70_000));
        assert_eq!(s.currency.as_deref(), Some("USD"));
        assert_eq!(s.interval, PayInterval::Yearly);
    }

    #[test]
    fn european_grouping() {
        let s = parse_salary("€45.000");
        assert_eq!(s.min, Some(45_000));
        assert_eq!(s.max, None);
        assert_eq!(s.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn lakh_suffix_defaults_to_yearly() {
        let s = parse_salary("10 LPA");
        assert_eq!(s.min, Some(1_000_000));
        assert_eq!(s.interval, PayInterval::Yearly);

        let s = parse_salary("10-15 LPA");
        assert_eq!(s.min, Some(1_000_000));
        assert_eq!(s.max, Some(1_500_000));

        let s = parse_salary("₹8 lakh - 12 lakh");
        assert_eq!(s.min, Some(800_000));
        assert_eq!(s.max, Some(1_200_000));
        assert_eq!(s.currency.as_deref(), Some("INR"));
    }

    #[test]
    fn k_suffix_and_to_separator() {
        let s = parse_salary("£40k to £55k");
        assert_eq!(s.min, Some(40_000));
        assert_eq!(s.max, Some(55_000));
        assert_eq!(s.currency.as_deref(), Some("GBP"));
    }

    #[test]
    fn decimal_point_is_kept() {
        assert_eq!(parse_amount("12.50"), Some(12));
        assert_eq!(parse_amount("1.5k"), Some(1_500));
        assert_eq!(parse_amount("1.234.567"), Some(1_234_567));
        assert_eq!(parse_amount("1,234.56"), Some(1_234));
    }

    #[test]
    fn intervals() {
        assert_eq!(parse_salary("$25 - $30 an hour").interval, PayInterval::Hourly);
        assert_eq!(parse_salary("$20/hr").interval, PayInterval::Hourly);
        assert_eq!(parse_salary("€300 per day").interval, PayInterval::Daily);
        assert_eq!(parse_salary("$900 weekly").interval, PayInterval::Weekly);
        assert_eq!(parse_salary("AED 12,000 per month").interval, PayInterval::Monthly);
        assert_eq!(parse_salary("$120k").interval, PayInterval::Yearly);
    }

    #[test]
    fn prefixed_dollar_variants_and_codes() {
        assert_eq!(detect_currency("A$90,000"), Some("AUD".into()));
        assert_eq!(detect_currency("C$70k"), Some("CAD".into()));
        assert_eq!(detect_currency("AED 12,000 per month"), Some("AED".into()));
        assert_eq!(detect_currency("competitive"), None);
    }

    #[test]
    fn no_numbers_means_no_amount() {
        let s = parse_salary("Competitive salary");
        assert!(!s.has_amount());
    }

    #[test]
    fn pay_markers() {
        assert!(has_pay_marker("Salary 10-15 LPA, Bangalore"));
        assert!(has_pay_marker("Up to 80k"));
        assert!(has_pay_marker("AED 12,000 per month"));
        assert!(has_pay_marker("3000 per month plus housing"));
        assert!(!has_pay_marker("3+ years of experience, team of 12"));
        assert!(!has_pay_marker("5 day week, kitchen on site"));
    }

    #[test]
    fn formats_display_string() {
        assert_eq!(
            format_salary(Some(50_000), Some(70_000), Some("USD"), Some(PayInterval::Yearly)),
            "50000–70000 USD/yearly"
        );
        assert_eq!(
            format_salary(None, Some(30), Some("EUR"), Some(PayInterval::Hourly)),
            "30 EUR/hourly"
        );
        assert_eq!(format_salary(None, None, None, None), PLACEHOLDER);
    }
}
