use std::time::Instant;

use chrono::{Local, NaiveDateTime};
use tokio_util::sync::CancellationToken;

use crate::dedup::assemble;
use crate::dispatch::{DispatchLimits, Dispatcher, SourceRegistry, TracingDispatchReporter};
use crate::error::AppError;
use crate::models::{NormalizedJob, RawJob, SearchRequest};
use crate::normalize::normalize_job;

/// Largest quota a single search may ask for.
pub const MAX_RESULTS: usize = 1000;

/// Engine entry point: dispatch, normalize, filter and assemble.
#[derive(Clone)]
pub struct JobSearch {
    dispatcher: Dispatcher,
}

impl JobSearch {
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            dispatcher: Dispatcher::new(registry),
        }
    }

    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn registry(&self) -> &SourceRegistry {
        self.dispatcher.registry()
    }

    /// Run one aggregation.
    ///
    /// Source failures never fail the call; an empty list can mean either
    /// that nothing matched or that every source was blocked.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<NormalizedJob>, AppError> {
        self.search_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Like [`search`](Self::search), stopping early when `cancel` fires.
    pub async fn search_with_cancel(
        &self,
        request: &SearchRequest,
        cancel: CancellationToken,
    ) -> Result<Vec<NormalizedJob>, AppError> {
        validate(request)?;

        let ids = request.source_ids();
        if !ids.iter().any(|id| self.registry().contains(id)) {
            return Err(AppError::NoSources(ids.join(",")));
        }
        if request.results_wanted == 0 {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let query = request.source_query();
        let limits = DispatchLimits {
            request_timeout: request.request_timeout,
            deadline: request.scrape_timeout,
        };
        let rows = self
            .dispatcher
            .scrape_all(&ids, &query, limits, &cancel, &TracingDispatchReporter)
            .await;
        let raw_count = rows.len();

        let now = Local::now().naive_local();
        let jobs = finish(rows.iter().map(|raw| normalize_job(raw, now)), request);

        tracing::info!(
            sources = ids.len(),
            raw = raw_count,
            count = jobs.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Search complete"
        );
        Ok(jobs)
    }
}

fn validate(request: &SearchRequest) -> Result<(), AppError> {
    if request.request_timeout.is_zero() {
        return Err(AppError::InvalidArgument(
            "request timeout must be greater than zero".into(),
        ));
    }
    if request.results_wanted > MAX_RESULTS {
        return Err(AppError::InvalidArgument(format!(
            "results_wanted must be at most {MAX_RESULTS}, got {}",
            request.results_wanted
        )));
    }
    Ok(())
}

/// Drop records contradicting the filters, then dedup up to the quota.
fn finish<I>(jobs: I, request: &SearchRequest) -> Vec<NormalizedJob>
where
    I: Iterator<Item = NormalizedJob>,
{
    let remote = request.remote;
    let job_type = request.job_type;
    let kept = jobs.filter(move |job| {
        remote.accepts(job.remote_bool)
            && job_type.is_none_or(|want| job.job_type.is_none_or(|got| got == want))
    });
    assemble(kept, request.results_wanted)
}

/// Normalize and assemble already-scraped records, skipping the fetch step.
pub fn aggregate<'a, I>(rows: I, request: &SearchRequest, now: NaiveDateTime) -> Vec<NormalizedJob>
where
    I: IntoIterator<Item = &'a RawJob>,
{
    finish(rows.into_iter().map(|raw| normalize_job(raw, now)), request)
}
