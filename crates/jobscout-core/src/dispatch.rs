use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::models::{RawJob, SourceQuery};
use crate::traits::JobSource;

/// Maximum number of sources scraped at the same time.
pub const POOL_WIDTH: usize = 3;

/// Maps source ids to their collaborators.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn JobSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under its own id, replacing any previous one.
    pub fn register<S: JobSource + 'static>(&mut self, source: S) {
        self.sources
            .insert(source.id().to_string(), Arc::new(source));
    }

    pub fn with<S: JobSource + 'static>(mut self, source: S) -> Self {
        self.register(source);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    /// The collaborator for `id`; unknown ids resolve to one that finds nothing.
    pub fn resolve(&self, id: &str) -> Arc<dyn JobSource> {
        match self.sources.get(id) {
            Some(source) => Arc::clone(source),
            None => Arc::new(NoopSource(id.to_string())),
        }
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sources.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Stand-in for an unregistered id.
pub struct NoopSource(String);

impl JobSource for NoopSource {
    fn id(&self) -> &str {
        &self.0
    }

    fn scrape<'a>(
        &'a self,
        _query: &'a SourceQuery,
        _timeout_budget: Duration,
    ) -> BoxFuture<'a, Result<Vec<RawJob>, AppError>> {
        Box::pin(future::ready(Ok(Vec::new())))
    }
}

/// Events emitted while a fan-out runs.
#[derive(Debug, Clone)]
pub enum DispatchEvent<'a> {
    UnknownSource {
        source: &'a str,
    },
    SourceFinished {
        source: &'a str,
        count: usize,
        elapsed: Duration,
    },
    SourceFailed {
        source: &'a str,
        error: &'a AppError,
    },
    SourcePanicked {
        source: &'a str,
    },
    Interrupted {
        pending: usize,
    },
    Completed {
        sources: usize,
        count: usize,
        elapsed: Duration,
    },
}

/// Receives dispatch events (decoupled logging).
pub trait DispatchReporter: Send + Sync {
    fn report(&self, event: DispatchEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDispatchReporter;

impl DispatchReporter for TracingDispatchReporter {
    fn report(&self, event: DispatchEvent<'_>) {
        match event {
            DispatchEvent::UnknownSource { source } => {
                tracing::warn!(%source, "Unknown source id, skipping");
            }
            DispatchEvent::SourceFinished {
                source,
                count,
                elapsed,
            } => {
                tracing::debug!(%source, count, elapsed_ms = elapsed.as_millis() as u64, "Source finished");
            }
            DispatchEvent::SourceFailed { source, error } => {
                tracing::warn!(%source, %error, blocked = error.is_block(), "Source failed, no records");
            }
            DispatchEvent::SourcePanicked { source } => {
                tracing::error!(%source, "Source panicked, no records");
            }
            DispatchEvent::Interrupted { pending } => {
                tracing::warn!(pending, "Scrape interrupted, dropping unfinished sources");
            }
            DispatchEvent::Completed {
                sources,
                count,
                elapsed,
            } => {
                tracing::debug!(sources, count, elapsed_ms = elapsed.as_millis() as u64, "Dispatch complete");
            }
        }
    }
}

/// Timing limits for one fan-out.
#[derive(Debug, Clone, Copy)]
pub struct DispatchLimits {
    /// Passed to every source as its per-request budget.
    pub request_timeout: Duration,
    /// Hard deadline over the whole fan-out; `None` waits for every source.
    pub deadline: Option<Duration>,
}

/// Runs the requested sources with bounded concurrency.
#[derive(Clone)]
pub struct Dispatcher {
    registry: SourceRegistry,
    pool_width: usize,
}

impl Dispatcher {
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            registry,
            pool_width: POOL_WIDTH,
        }
    }

    pub fn with_pool_width(mut self, pool_width: usize) -> Self {
        self.pool_width = pool_width.max(1);
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Scrape every id in `ids` and flatten the results.
    ///
    /// Never fails: unknown ids, source errors and panics all contribute an
    /// empty list. Records arrive in completion order. When the deadline
    /// fires or `cancel` is triggered, sources still running are dropped and
    /// whatever was collected so far is returned.
    pub async fn scrape_all<R: DispatchReporter>(
        &self,
        ids: &[String],
        query: &SourceQuery,
        limits: DispatchLimits,
        cancel: &CancellationToken,
        reporter: &R,
    ) -> Vec<RawJob> {
        let started = Instant::now();
        let mut rows = Vec::new();
        if ids.is_empty() {
            return rows;
        }

        let width = self.pool_width.min(ids.len());
        let tasks = (0..ids.len()).map(|i| {
            let id = &ids[i];
            if !self.registry.contains(id) {
                reporter.report(DispatchEvent::UnknownSource { source: id });
            }
            let source = self.registry.resolve(id);
            run_isolated(source, query, limits.request_timeout, reporter)
        });
        let mut results = stream::iter(tasks).buffer_unordered(width);

        let deadline = async {
            match limits.deadline {
                Some(limit) => tokio::time::sleep(limit).await,
                None => future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let mut finished = 0;
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    reporter.report(DispatchEvent::Interrupted { pending: ids.len() - finished });
                    break;
                }
                next = results.next() => match next {
                    Some(batch) => {
                        finished += 1;
                        rows.extend(batch);
                    }
                    None => break,
                },
                () = &mut deadline => {
                    reporter.report(DispatchEvent::Interrupted { pending: ids.len() - finished });
                    break;
                }
            }
        }

        reporter.report(DispatchEvent::Completed {
            sources: finished,
            count: rows.len(),
            elapsed: started.elapsed(),
        });
        rows
    }
}

/// One source call with errors and panics turned into an empty list.
async fn run_isolated<R: DispatchReporter>(
    source: Arc<dyn JobSource>,
    query: &SourceQuery,
    timeout_budget: Duration,
    reporter: &R,
) -> Vec<RawJob> {
    let started = Instant::now();
    let outcome = AssertUnwindSafe(async { source.scrape(query, timeout_budget).await })
        .catch_unwind()
        .await;
    match outcome {
        Ok(Ok(rows)) => {
            reporter.report(DispatchEvent::SourceFinished {
                source: source.id(),
                count: rows.len(),
                elapsed: started.elapsed(),
            });
            rows
        }
        Ok(Err(error)) => {
            reporter.report(DispatchEvent::SourceFailed {
                source: source.id(),
                error: &error,
            });
            Vec::new()
        }
        Err(_) => {
            reporter.report(DispatchEvent::SourcePanicked {
                source: source.id(),
            });
            Vec::new()
        }
    }
}
