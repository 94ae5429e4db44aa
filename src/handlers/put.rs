use crate::dispatch::{GatewayResponse, RouteKey};
use crate::routes;
use crate::state::AppState;
use axum::extract::State;
use std::collections::HashMap;

/// PUT /items handler - Create or replace an item
///
/// The body is passed to the dispatcher raw so that parse failures surface
/// through its failure boundary rather than the framework's. The payload's
/// `id` names the item; unrecognized fields are dropped.
#[utoipa::path(
    put,
    path = routes::ITEMS,
    request_body = crate::item::Item,
    responses(
        (status = 200, description = "Confirmation naming the upserted id", body = String),
        (status = 400, description = "Handled failure; body is the failure message", body = String)
    ),
    tag = "items"
)]
pub async fn put_handler(State(state): State<AppState>, body: String) -> GatewayResponse {
    state
        .dispatcher
        .handle(RouteKey::PUT_ITEM, &HashMap::new(), Some(&body))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::test_state;
    use crate::item::Item;
    use crate::store::ItemStore;
    use axum::http::StatusCode;
    use axum::{body::Body, http::Request, routing::put, Router};
    use serde_json::json;
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_put_stores_item_and_confirms() {
        let (store, state) = test_state();
        let app = Router::new()
            .route(routes::ITEMS, put(put_handler))
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/items")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"id":"a1","name":"widget","price":9.5}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!("Put item a1"));

        let stored = store.get("a1").await.unwrap();
        assert_eq!(stored, Some(Item::new("a1").with_name("widget").with_price(9.5)));
    }

    #[tokio::test]
    async fn test_put_malformed_body_is_rejected() {
        let (store, state) = test_state();
        let app = Router::new()
            .route(routes::ITEMS, put(put_handler))
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/items")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let message = body_json(response).await;
        assert!(message.as_str().unwrap().contains("Malformed request body"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_put_without_id_is_rejected() {
        let (store, state) = test_state();
        let app = Router::new()
            .route(routes::ITEMS, put(put_handler))
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/items")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"no key"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }
}
