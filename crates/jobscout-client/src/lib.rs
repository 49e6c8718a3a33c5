pub mod sources;
pub mod transport;

use jobscout_core::config::EngineConfig;
use jobscout_core::engine::JobSearch;
use jobscout_core::error::AppError;
use jobscout_core::fetch::ResilientFetcher;

pub use sources::{ALL_SOURCES, Site, SiteSource, default_registry};
pub use transport::ReqwestTransport;

/// Engine wired to the real network and every built-in site.
pub fn build_search(config: &EngineConfig) -> Result<JobSearch, AppError> {
    let fetcher = ResilientFetcher::new(ReqwestTransport::new()?, config.throttle())
        .with_proxies(config.proxies.clone())
        .with_delays(config.delays());
    Ok(JobSearch::new(default_registry(fetcher)))
}
