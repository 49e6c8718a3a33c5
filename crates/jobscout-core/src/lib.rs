pub mod config;
pub mod dedup;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod identity;
pub mod models;
pub mod normalize;
pub mod throttle;
pub mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use config::EngineConfig;
pub use dedup::assemble;
pub use dispatch::{Dispatcher, SourceRegistry};
pub use engine::JobSearch;
pub use error::AppError;
pub use fetch::{ResilientFetcher, RetryDelays};
pub use models::{JobType, NormalizedJob, RawJob, RemoteFilter, SearchRequest, SourceQuery};
pub use throttle::{HostThrottle, ThrottleConfig};
pub use traits::{FetchOptions, Fetcher, HttpRequest, HttpResponse, JobSource, Transport};
