//! Test utilities: mock implementations of the core seams.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::future::BoxFuture;

use crate::error::AppError;
use crate::models::{RawJob, SourceQuery};
use crate::traits::{HttpRequest, HttpResponse, JobSource, Transport};

// ---------------------------------------------------------------------------
// MockTransport
// ---------------------------------------------------------------------------

/// Mock transport that plays back scripted responses and records requests.
#[derive(Clone)]
pub struct MockTransport {
    /// Queue of responses. Each call pops the first element; once empty,
    /// `fallback` is returned.
    responses: Arc<Mutex<Vec<Result<HttpResponse, AppError>>>>,
    fallback: HttpResponse,
    requests: Arc<Mutex<Vec<(Instant, HttpRequest)>>>,
}

impl MockTransport {
    pub fn with_responses(responses: Vec<Result<HttpResponse, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            fallback: HttpResponse {
                status: 200,
                body: "<html><body>default</body></html>".to_string(),
            },
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the same response for every call.
    pub fn always(response: HttpResponse) -> Self {
        Self {
            fallback: response,
            ..Self::with_responses(Vec::new())
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.requests.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

impl Transport for MockTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, AppError> {
        self.requests
            .lock()
            .unwrap()
            .push((Instant::now(), request.clone()));
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.fallback.clone())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockSource
// ---------------------------------------------------------------------------

/// Mock source returning fixed records, an error, or records after a delay.
#[derive(Clone)]
pub struct MockSource {
    id: String,
    jobs: Vec<RawJob>,
    error: Option<String>,
    delay: Duration,
    pub calls: Arc<Mutex<Vec<SourceQuery>>>,
}

impl MockSource {
    pub fn new(id: &str, jobs: Vec<RawJob>) -> Self {
        Self {
            id: id.to_string(),
            jobs,
            error: None,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A source whose every call fails.
    pub fn failing(id: &str) -> Self {
        Self {
            error: Some(format!("{id} is down")),
            ..Self::new(id, Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl JobSource for MockSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn scrape<'a>(
        &'a self,
        query: &'a SourceQuery,
        _timeout_budget: Duration,
    ) -> BoxFuture<'a, Result<Vec<RawJob>, AppError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(query.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.error {
                Some(msg) => Err(AppError::FetchExhausted {
                    attempts: 3,
                    last: Box::new(AppError::NetworkError(msg.clone())),
                }),
                None => Ok(self.jobs.clone()),
            }
        })
    }
}

/// Source that panics when scraped.
#[derive(Clone)]
pub struct PanickingSource;

impl JobSource for PanickingSource {
    fn id(&self) -> &str {
        "panicking"
    }

    fn scrape<'a>(
        &'a self,
        _query: &'a SourceQuery,
        _timeout_budget: Duration,
    ) -> BoxFuture<'a, Result<Vec<RawJob>, AppError>> {
        Box::pin(async { corrupted() })
    }
}

fn corrupted() -> Result<Vec<RawJob>, AppError> {
    panic!("selector table corrupted")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A raw record with the given site, title and URL.
pub fn raw_job(site: &str, title: &str, url: &str) -> RawJob {
    RawJob {
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Berlin".to_string(),
        site: site.to_string(),
        job_url: url.to_string(),
        ..RawJob::default()
    }
}
