//! Concrete job-site scrapers.
//!
//! Every site is a [`Site`]: it knows how to build a search URL and how to
//! turn the returned page into [`RawJob`] records. [`SiteSource`] wraps a
//! site with a [`Fetcher`] and exposes it as a [`JobSource`], absorbing
//! fetch and parse failures into an empty list.

pub mod bayt;
pub mod bdjobs;
pub mod glassdoor;
pub mod google;
pub mod indeed;
pub mod linkedin;
pub mod naukri;
pub mod zip_recruiter;

use std::marker::PhantomData;
use std::time::Duration;

use futures::future::BoxFuture;
use jobscout_core::dispatch::SourceRegistry;
use jobscout_core::error::AppError;
use jobscout_core::models::{RawJob, SourceQuery};
use jobscout_core::traits::{FetchOptions, Fetcher, JobSource};
use scraper::{ElementRef, Selector};
use url::Url;

pub use self::bayt::Bayt;
pub use self::bdjobs::BdJobs;
pub use self::glassdoor::Glassdoor;
pub use self::google::Google;
pub use self::indeed::Indeed;
pub use self::linkedin::LinkedIn;
pub use self::naukri::Naukri;
pub use self::zip_recruiter::ZipRecruiter;

/// Ids of every built-in site.
pub const ALL_SOURCES: &[&str] = &[
    Indeed::ID,
    ZipRecruiter::ID,
    Glassdoor::ID,
    Google::ID,
    LinkedIn::ID,
    Bayt::ID,
    Naukri::ID,
    BdJobs::ID,
];

/// URL building and page parsing for one job site.
pub trait Site: Send + Sync + 'static {
    const ID: &'static str;
    const ACCEPT_LANGUAGE: &'static str = "en-US,en;q=0.9";

    fn search_url(query: &SourceQuery) -> Result<String, AppError>;

    fn parse(html: &str, query: &SourceQuery) -> Result<Vec<RawJob>, AppError>;
}

/// A [`Site`] bound to a fetcher.
pub struct SiteSource<S, F> {
    fetcher: F,
    site: PhantomData<fn() -> S>,
}

impl<S: Site, F: Fetcher> SiteSource<S, F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            site: PhantomData,
        }
    }

    /// Fetch and parse one results page. Failures yield an empty list.
    pub async fn collect(&self, query: &SourceQuery, timeout_budget: Duration) -> Vec<RawJob> {
        let url = match S::search_url(query) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(source = S::ID, error = %e, "Could not build search URL");
                return Vec::new();
            }
        };
        let options = FetchOptions::default()
            .with_timeout(timeout_budget)
            .with_accept_language(S::ACCEPT_LANGUAGE);

        let html = match self.fetcher.fetch(&url, &options).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(source = S::ID, %url, error = %e, blocked = e.is_block(), "Fetch failed");
                return Vec::new();
            }
        };

        match S::parse(&html, query) {
            Ok(rows) => {
                tracing::debug!(source = S::ID, count = rows.len(), "Parsed listings");
                rows
            }
            Err(e) => {
                tracing::warn!(source = S::ID, %url, error = %e, "Parse failed");
                Vec::new()
            }
        }
    }
}

impl<S: Site, F: Fetcher + 'static> JobSource for SiteSource<S, F> {
    fn id(&self) -> &str {
        S::ID
    }

    fn scrape<'a>(
        &'a self,
        query: &'a SourceQuery,
        timeout_budget: Duration,
    ) -> BoxFuture<'a, Result<Vec<RawJob>, AppError>> {
        Box::pin(async move { Ok(self.collect(query, timeout_budget).await) })
    }
}

/// Registry with every built-in site sharing one fetcher.
pub fn default_registry<F: Fetcher + 'static>(fetcher: F) -> SourceRegistry {
    SourceRegistry::new()
        .with(SiteSource::<Indeed, F>::new(fetcher.clone()))
        .with(SiteSource::<ZipRecruiter, F>::new(fetcher.clone()))
        .with(SiteSource::<Glassdoor, F>::new(fetcher.clone()))
        .with(SiteSource::<Google, F>::new(fetcher.clone()))
        .with(SiteSource::<LinkedIn, F>::new(fetcher.clone()))
        .with(SiteSource::<Bayt, F>::new(fetcher.clone()))
        .with(SiteSource::<Naukri, F>::new(fetcher.clone()))
        .with(SiteSource::<BdJobs, F>::new(fetcher))
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

pub(crate) fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| AppError::ParseError(format!("Invalid selector '{css}': {e}")))
}

/// `base` with the non-empty `params` appended as a query string.
pub(crate) fn with_params(base: &str, params: &[(&str, String)]) -> Result<String, AppError> {
    let mut url = Url::parse(base).map_err(|e| AppError::ParseError(format!("Invalid base URL: {e}")))?;
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            if !value.is_empty() {
                pairs.append_pair(key, value);
            }
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    Ok(url.to_string())
}

/// Text content with whitespace runs collapsed to single spaces.
pub(crate) fn text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first descendant matching `sel`, or `""`.
pub(crate) fn first_text(el: ElementRef<'_>, sel: &Selector) -> String {
    el.select(sel).next().map(text).unwrap_or_default()
}

/// Attribute of the first descendant matching `sel`, or `""`.
pub(crate) fn first_attr(el: ElementRef<'_>, sel: &Selector, attr: &str) -> String {
    el.select(sel)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Resolve a site-relative link against `origin`; absolute links pass through.
pub(crate) fn absolutize(origin: &str, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    match Url::parse(origin).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

/// `Some(text)` unless empty.
pub(crate) fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
