use crate::dispatch::{GatewayResponse, RouteKey};
use crate::routes;
use crate::state::AppState;
use axum::extract::{Path, State};
use std::collections::HashMap;

/// DELETE /items/:id handler - Remove an item
///
/// Idempotent: deleting an absent id still returns the confirmation.
#[utoipa::path(
    delete,
    path = routes::ITEM,
    params(
        ("id" = String, Path, description = "Item identifier")
    ),
    responses(
        (status = 200, description = "Confirmation naming the deleted id", body = String),
        (status = 400, description = "Handled failure; body is the failure message", body = String)
    ),
    tag = "items"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> GatewayResponse {
    let path_params = HashMap::from([("id".to_string(), id)]);
    state
        .dispatcher
        .handle(RouteKey::DELETE_ITEM, &path_params, None)
        .await
}
