use jobscout_core::JobSearch;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub search: JobSearch,
}
