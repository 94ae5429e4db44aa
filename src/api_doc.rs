use utoipa::OpenApi;

use crate::error::{HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::item::Item;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "item-gateway API",
        version = "1.0.0",
        description = "A minimal HTTP CRUD gateway over a key-value item store"
    ),
    paths(
        handlers::health::health_handler,
        handlers::put::put_handler,
        handlers::get::get_handler,
        handlers::list::list_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            Item,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "items", description = "Item CRUD operations")
    )
)]
pub struct ApiDoc;
