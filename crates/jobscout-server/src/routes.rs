use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::dto::{HealthResponse, JobRow, SearchQuery, SearchResponse};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new().route("/v1/search", get(search));

    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(api).with_state(state)
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/v1/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Merged, deduplicated postings", body = SearchResponse),
        (status = 400, description = "Invalid filter or no known source", body = crate::dto::ErrorResponse),
    ),
    tag = "search"
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let request = query.into_request()?;
    tracing::info!(query = %request.search_term, sources = ?request.source_ids(), "Search requested");

    let jobs = state.search.search(&request).await?;
    let rows: Vec<JobRow> = jobs.into_iter().map(JobRow::from).collect();

    Ok(axum::Json(SearchResponse {
        ok: true,
        count: rows.len(),
        rows,
    }))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    axum::Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        sources: state.search.registry().ids(),
    })
}
