use std::sync::Arc;

use axum::Router;

use jobscout_core::models::RawJob;
use jobscout_core::testutil::{MockSource, raw_job};
use jobscout_core::{JobSearch, SourceRegistry};
use jobscout_server::routes;
use jobscout_server::state::AppState;

/// Router backed by in-memory sources under the endpoint's default ids.
///
/// `indeed` and `google` overlap on one posting; `glassdoor` is down.
pub fn setup_test_app() -> Router {
    let mut remote = raw_job("google", "Remote Rust Engineer", "https://jobs.example.com/rust-remote");
    remote.description = "Fully remote, work from home.".to_string();

    let indeed: Vec<RawJob> = vec![
        raw_job("indeed", "Rust Engineer", "https://jobs.example.com/rust?utm_source=indeed"),
        RawJob {
            salary_text: Some("$50,000 - $70,000 a year".to_string()),
            ..raw_job("indeed", "Backend Developer", "https://jobs.example.com/backend")
        },
    ];
    let google = vec![
        raw_job("google", "Rust Engineer", "https://jobs.example.com/rust"),
        remote,
    ];

    let registry = SourceRegistry::new()
        .with(MockSource::new("indeed", indeed))
        .with(MockSource::new("google", google))
        .with(MockSource::new("zip_recruiter", Vec::new()))
        .with(MockSource::failing("glassdoor"))
        .with(MockSource::new(
            "bayt",
            vec![raw_job("bayt", "Accountant", "https://www.bayt.com/en/jobs/1/")],
        ));

    let state = Arc::new(AppState {
        search: JobSearch::new(registry),
    });

    routes::router(state)
}
