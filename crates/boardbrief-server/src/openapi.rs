use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Boardbrief API",
        version = "0.1.0",
        description = "Summarizes board game pages with several models side by side."
    ),
    paths(crate::routes::summarize, crate::routes::health),
    components(schemas(crate::dto::HealthResponse, crate::dto::ErrorResponse)),
    tags(
        (name = "summarize", description = "Multi-model page summaries"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
