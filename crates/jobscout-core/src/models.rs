use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Placeholder rendered for any value a source did not provide.
pub const PLACEHOLDER: &str = "—";

/// Sources queried when the caller does not name any.
pub const DEFAULT_SOURCES: &[&str] = &["indeed", "google", "zip_recruiter", "glassdoor", "linkedin"];

/// Unnormalized record as produced by one source's scraper.
///
/// Every field is best-effort; empty strings and `None` mean the site
/// did not expose the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub site: String,
    pub job_url: String,
    pub date_posted: String,
    pub description: String,
    pub salary_text: Option<String>,
    pub job_type: Option<String>,
    pub is_remote: Option<bool>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub currency: Option<String>,
    pub interval: Option<String>,
}

/// Canonicalized, schema-uniform record ready for display or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub site: String,
    /// `DD.MM.YYYY`, or the raw string when it could not be interpreted.
    pub date_posted: String,
    pub job_type: Option<JobType>,
    /// Display label: "Remote", "Office/Hybrid" or the placeholder.
    pub remote: String,
    pub remote_bool: Option<bool>,
    /// Display string such as `50000–70000 USD/yearly`.
    pub salary: String,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
    pub currency: Option<String>,
    pub interval: Option<PayInterval>,
    /// Scheme + host + path; empty when the source gave no usable URL.
    pub job_url: String,
    /// The URL exactly as scraped, for deep-linking.
    pub job_url_raw: String,
    pub description: String,
}

impl NormalizedJob {
    /// The value used to decide two records describe the same posting.
    ///
    /// Falls back to `title|company|location` when no URL is known, which
    /// can merge distinct postings with identical text fields.
    pub fn dedup_key(&self) -> String {
        if self.job_url.is_empty() {
            format!("{}|{}|{}", self.title, self.company, self.location)
        } else {
            self.job_url.clone()
        }
    }

    /// Job type for display, or the placeholder.
    pub fn job_type_label(&self) -> &'static str {
        self.job_type.map(|t| t.as_str()).unwrap_or(PLACEHOLDER)
    }
}

/// Employment type, either explicit from a source or inferred from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "fulltime",
            JobType::PartTime => "parttime",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match key.as_str() {
            "fulltime" => Ok(JobType::FullTime),
            "parttime" => Ok(JobType::PartTime),
            "contract" | "contractor" | "temporary" => Ok(JobType::Contract),
            "internship" | "intern" => Ok(JobType::Internship),
            _ => Err(format!("Unknown job type: {s}")),
        }
    }
}

/// Pay period attached to a salary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayInterval {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl PayInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayInterval::Hourly => "hourly",
            PayInterval::Daily => "daily",
            PayInterval::Weekly => "weekly",
            PayInterval::Monthly => "monthly",
            PayInterval::Yearly => "yearly",
        }
    }
}

impl fmt::Display for PayInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PayInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hourly" | "hour" => Ok(PayInterval::Hourly),
            "daily" | "day" => Ok(PayInterval::Daily),
            "weekly" | "week" => Ok(PayInterval::Weekly),
            "monthly" | "month" => Ok(PayInterval::Monthly),
            "yearly" | "year" | "annual" | "annually" => Ok(PayInterval::Yearly),
            _ => Err(format!("Unknown pay interval: {s}")),
        }
    }
}

/// Tri-state remote filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteFilter {
    Required,
    Excluded,
    #[default]
    Any,
}

impl RemoteFilter {
    /// Whether a record with the given resolved remote flag passes.
    ///
    /// Unresolved flags always pass.
    pub fn accepts(&self, remote: Option<bool>) -> bool {
        match (self, remote) {
            (RemoteFilter::Required, Some(false)) => false,
            (RemoteFilter::Excluded, Some(true)) => false,
            _ => true,
        }
    }
}

impl FromStr for RemoteFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "true" | "required" | "remote" => Ok(RemoteFilter::Required),
            "no" | "false" | "excluded" | "onsite" => Ok(RemoteFilter::Excluded),
            "" | "any" => Ok(RemoteFilter::Any),
            _ => Err(format!("Unknown remote filter: {s}")),
        }
    }
}

/// What a single Source Collaborator is asked to find.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceQuery {
    pub search_term: String,
    pub location: String,
    pub hours_old: Option<u32>,
    pub offset: u32,
    pub country_code: String,
    pub distance: Option<u32>,
}

/// Engine entry point options.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Requested source ids; `None` means [`DEFAULT_SOURCES`].
    pub sources: Option<Vec<String>>,
    pub search_term: String,
    pub location: String,
    pub distance: Option<u32>,
    pub remote: RemoteFilter,
    pub job_type: Option<JobType>,
    pub hours_old: Option<u32>,
    /// Result quota.
    pub results_wanted: usize,
    pub country: String,
    pub offset: u32,
    /// Timeout for each individual HTTP attempt.
    pub request_timeout: Duration,
    /// Hard deadline for the whole fan-out; `None` disables it.
    pub scrape_timeout: Option<Duration>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            sources: None,
            search_term: String::new(),
            location: String::new(),
            distance: Some(50),
            remote: RemoteFilter::Any,
            job_type: None,
            hours_old: None,
            results_wanted: 25,
            country: "usa".to_string(),
            offset: 0,
            request_timeout: Duration::from_millis(3000),
            scrape_timeout: Some(Duration::from_millis(8000)),
        }
    }
}

impl SearchRequest {
    pub fn new(search_term: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            ..Self::default()
        }
    }

    /// Source ids to query, falling back to the default set.
    pub fn source_ids(&self) -> Vec<String> {
        match &self.sources {
            Some(ids) if !ids.is_empty() => ids.clone(),
            _ => DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The per-source part of the request.
    pub fn source_query(&self) -> SourceQuery {
        SourceQuery {
            search_term: self.search_term.trim().to_string(),
            location: self.location.trim().to_string(),
            hours_old: self.hours_old,
            offset: self.offset,
            country_code: self.country.trim().to_lowercase(),
            distance: self.distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(url: &str) -> NormalizedJob {
        NormalizedJob {
            title: "Engineer".into(),
            company: "Acme".into(),
            location: "Berlin".into(),
            site: "indeed".into(),
            date_posted: PLACEHOLDER.into(),
            job_type: None,
            remote: PLACEHOLDER.into(),
            remote_bool: None,
            salary: PLACEHOLDER.into(),
            min_amount: None,
            max_amount: None,
            currency: None,
            interval: None,
            job_url: url.into(),
            job_url_raw: url.into(),
            description: String::new(),
        }
    }

    #[test]
    fn dedup_key_prefers_url() {
        assert_eq!(job("https://acme.com/jobs/1").dedup_key(), "https://acme.com/jobs/1");
        assert_eq!(job("").dedup_key(), "Engineer|Acme|Berlin");
    }

    #[test]
    fn job_type_parses_common_spellings() {
        assert_eq!("Full-time".parse::<JobType>(), Ok(JobType::FullTime));
        assert_eq!("part_time".parse::<JobType>(), Ok(JobType::PartTime));
        assert_eq!("INTERNSHIP".parse::<JobType>(), Ok(JobType::Internship));
        assert!("volunteer".parse::<JobType>().is_err());
    }

    #[test]
    fn job_type_serializes_lowercase() {
        let json = serde_json::to_string(&JobType::FullTime).unwrap();
        assert_eq!(json, "\"fulltime\"");
    }

    #[test]
    fn remote_filter_lets_unresolved_through() {
        assert!(RemoteFilter::Required.accepts(None));
        assert!(RemoteFilter::Required.accepts(Some(true)));
        assert!(!RemoteFilter::Required.accepts(Some(false)));
        assert!(!RemoteFilter::Excluded.accepts(Some(true)));
        assert!(RemoteFilter::Any.accepts(Some(false)));
    }

    #[test]
    fn empty_source_list_uses_defaults() {
        let mut req = SearchRequest::new("rust");
        req.sources = Some(vec![]);
        assert_eq!(req.source_ids().len(), DEFAULT_SOURCES.len());
        req.sources = Some(vec!["bayt".into()]);
        assert_eq!(req.source_ids(), vec!["bayt".to_string()]);
    }
}
