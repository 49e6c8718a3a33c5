use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::error::AppError;
use crate::models::{RawJob, SourceQuery};

/// A single outgoing GET, fully resolved by the fetch engine.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub user_agent: String,
    pub headers: Vec<(String, String)>,
    /// Proxy endpoint to route through, if one was selected for this attempt.
    pub proxy: Option<String>,
    pub timeout: Duration,
}

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Performs exactly one HTTP GET. No retries, no pacing.
pub trait Transport: Send + Sync + Clone {
    fn get(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, AppError>> + Send;
}

/// Per-call fetch options.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub extra_headers: Vec<(String, String)>,
    pub max_attempts: u32,
    pub accept_language: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(3000),
            extra_headers: Vec::new(),
            max_attempts: 3,
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

impl FetchOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_accept_language(mut self, lang: impl Into<String>) -> Self {
        self.accept_language = lang.into();
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

/// Fetches a page body, absorbing transient failures internally.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// One pluggable scraper for a single job site.
///
/// Implementations should resolve internal failures to an empty list;
/// the dispatcher isolates errors and panics as a second line of defence.
pub trait JobSource: Send + Sync {
    /// Registry id, e.g. `"indeed"`.
    fn id(&self) -> &str;

    fn scrape<'a>(
        &'a self,
        query: &'a SourceQuery,
        timeout_budget: Duration,
    ) -> BoxFuture<'a, Result<Vec<RawJob>, AppError>>;
}
