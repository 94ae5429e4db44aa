use crate::dispatch::{GatewayResponse, RouteKey};
use crate::item::Item;
use crate::routes;
use crate::state::AppState;
use axum::extract::{Path, State};
use std::collections::HashMap;

/// GET /items/:id handler - Read a single item
///
/// A miss is not an error: the body is `null` with status 200.
#[utoipa::path(
    get,
    path = routes::ITEM,
    params(
        ("id" = String, Path, description = "Item identifier")
    ),
    responses(
        (status = 200, description = "The stored item, or null when absent", body = Item),
        (status = 400, description = "Handled failure; body is the failure message", body = String)
    ),
    tag = "items"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> GatewayResponse {
    let path_params = HashMap::from([("id".to_string(), id)]);
    state
        .dispatcher
        .handle(RouteKey::GET_ITEM, &path_params, None)
        .await
}
