use crate::dispatch::{GatewayResponse, RouteKey};
use crate::item::Item;
use crate::routes;
use crate::state::AppState;
use axum::extract::State;
use std::collections::HashMap;

/// GET /items handler - List every stored item
///
/// Unordered and unpaginated; an empty store yields `[]`.
#[utoipa::path(
    get,
    path = routes::ITEMS,
    responses(
        (status = 200, description = "All stored items", body = Vec<Item>),
        (status = 400, description = "Handled failure; body is the failure message", body = String)
    ),
    tag = "items"
)]
pub async fn list_handler(State(state): State<AppState>) -> GatewayResponse {
    state
        .dispatcher
        .handle(RouteKey::LIST_ITEMS, &HashMap::new(), None)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::test_state;
    use crate::store::ItemStore;
    use axum::http::StatusCode;
    use axum::{body::Body, http::Request, routing::get, Router};
    use serde_json::json;
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let (_, state) = test_state();
        let app = Router::new()
            .route(routes::ITEMS, get(list_handler))
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/items")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_list_returns_all_items() {
        let (store, state) = test_state();
        store.put(Item::new("a1").with_price(1.0)).await.unwrap();
        store.put(Item::new("b2").with_name("second")).await.unwrap();

        let app = Router::new()
            .route(routes::ITEMS, get(list_handler))
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/items")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|entry| entry["id"] == "a1"));
        assert!(listed.iter().any(|entry| entry["id"] == "b2"));
    }
}
