use serde::{Deserialize, Serialize};

use jobscout_core::error::AppError;
use jobscout_core::models::{JobType, NormalizedJob, RemoteFilter, SearchRequest};

/// Sources the endpoint queries when `sources` is absent or blank.
pub const ENDPOINT_DEFAULT_SOURCES: &[&str] = &["indeed", "zip_recruiter", "glassdoor", "google"];

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Search keywords
    pub q: Option<String>,
    /// Location
    pub loc: Option<String>,
    /// `yes`, `no` or `any`
    pub remote: Option<String>,
    /// Job type: fulltime, parttime, contract or internship
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    /// Only postings newer than this many hours
    pub hours: Option<u32>,
    pub offset: Option<u32>,
    /// Result quota (default 20)
    pub results: Option<usize>,
    /// Search radius
    pub dist: Option<u32>,
    /// Comma-separated source ids
    pub sources: Option<String>,
    /// Country code (default usa)
    pub country: Option<String>,
}

impl SearchQuery {
    /// Build the engine request, rejecting filter values that do not parse.
    pub fn into_request(self) -> Result<SearchRequest, AppError> {
        let remote = match self.remote.as_deref() {
            Some(s) => s.parse::<RemoteFilter>().map_err(AppError::InvalidArgument)?,
            None => RemoteFilter::Any,
        };
        let job_type = match self.job_type.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(s.parse::<JobType>().map_err(AppError::InvalidArgument)?),
            _ => None,
        };

        let mut sources: Vec<String> = self
            .sources
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if sources.is_empty() {
            sources = ENDPOINT_DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect();
        }

        let defaults = SearchRequest::default();
        Ok(SearchRequest {
            sources: Some(sources),
            search_term: self.q.unwrap_or_default(),
            location: self.loc.unwrap_or_default(),
            distance: self.dist.or(defaults.distance),
            remote,
            job_type,
            hours_old: self.hours,
            results_wanted: self.results.unwrap_or(20),
            country: self
                .country
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| "usa".to_string()),
            offset: self.offset.unwrap_or(0),
            ..defaults
        })
    }
}

/// One normalized posting as returned by the API.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JobRow {
    pub title: String,
    pub company: String,
    pub location: String,
    pub site: String,
    pub date_posted: String,
    pub job_type: Option<String>,
    pub remote: String,
    pub remote_bool: Option<bool>,
    pub salary: String,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
    pub currency: Option<String>,
    pub interval: Option<String>,
    pub job_url: String,
    pub job_url_raw: String,
    pub description: String,
}

impl From<NormalizedJob> for JobRow {
    fn from(job: NormalizedJob) -> Self {
        Self {
            title: job.title,
            company: job.company,
            location: job.location,
            site: job.site,
            date_posted: job.date_posted,
            job_type: job.job_type.map(|t| t.to_string()),
            remote: job.remote,
            remote_bool: job.remote_bool,
            salary: job.salary,
            min_amount: job.min_amount,
            max_amount: job.max_amount,
            currency: job.currency,
            interval: job.interval.map(|i| i.to_string()),
            job_url: job.job_url,
            job_url_raw: job.job_url_raw,
            description: job.description,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    pub ok: bool,
    pub count: usize,
    pub rows: Vec<JobRow>,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub sources: Vec<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
