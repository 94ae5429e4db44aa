use crate::dispatch::GatewayResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::http::{Method, Uri};
use std::collections::HashMap;

/// Router fallback - any request outside the registered routes
///
/// The raw `METHOD /path` is fed through the dispatcher unchanged, so an
/// unrecognized route surfaces as the same 400 envelope the dispatcher
/// produces for any other unsupported routing key, not as a framework 404.
pub async fn fallback_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> GatewayResponse {
    let routing_key = format!("{} {}", method, uri.path());
    state
        .dispatcher
        .handle(&routing_key, &HashMap::new(), None)
        .await
}
