use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Jobscout API",
        version = "0.1.0",
        description = "Aggregated job search across several job boards."
    ),
    paths(crate::routes::search, crate::routes::health),
    components(schemas(
        crate::dto::JobRow,
        crate::dto::SearchResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "search", description = "Job search"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
