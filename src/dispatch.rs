//! Request routing and dispatch.
//!
//! A routing key (HTTP method + path pattern) selects one of four store
//! operations; results and failures are normalized into a uniform response
//! envelope. Each invocation is stateless and issues exactly one store call;
//! there is no retry, caching, or cross-call state. The dispatcher depends on
//! the `ItemStore` trait only and never imports the HTTP framework.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::DispatchError;
use crate::item::Item;
use crate::store::ItemStore;

/// The recognized routing keys. Dispatch is an exhaustive match over this
/// enum; a key that fails to parse is an unsupported route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKey {
    DeleteItem,
    GetItem,
    ListItems,
    PutItem,
}

impl RouteKey {
    pub const DELETE_ITEM: &'static str = "DELETE /items/{id}";
    pub const GET_ITEM: &'static str = "GET /items/{id}";
    pub const LIST_ITEMS: &'static str = "GET /items";
    pub const PUT_ITEM: &'static str = "PUT /items";

    /// Parse a routing key string. Case-sensitive, exact; no other values
    /// are recognized.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            Self::DELETE_ITEM => Some(RouteKey::DeleteItem),
            Self::GET_ITEM => Some(RouteKey::GetItem),
            Self::LIST_ITEMS => Some(RouteKey::ListItems),
            Self::PUT_ITEM => Some(RouteKey::PutItem),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouteKey::DeleteItem => Self::DELETE_ITEM,
            RouteKey::GetItem => Self::GET_ITEM,
            RouteKey::ListItems => Self::LIST_ITEMS,
            RouteKey::PutItem => Self::PUT_ITEM,
        }
    }
}

/// Uniform response envelope. Every invocation of the dispatcher produces
/// one of these — 200 with a serialized payload, or 400 with the failure's
/// message — always with a JSON content type.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status_code: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
}

impl GatewayResponse {
    fn with_status(status_code: u16, body: String) -> Self {
        let headers = HashMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);
        Self {
            status_code,
            body,
            headers,
        }
    }
}

/// Maps routing keys to item store operations.
///
/// Holds the single shared store handle; cloning is cheap and per-request.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn ItemStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// The shared store handle, for callers outside the routing-key contract
    /// (health probing).
    pub fn store(&self) -> &Arc<dyn ItemStore> {
        &self.store
    }

    /// Single entry point: route, invoke, shape the result.
    ///
    /// `path_params` must carry `id` for the two single-item routes; `body`
    /// is consumed only by `PUT /items`. This never fails: any error inside
    /// the decision-and-dispatch sequence — unrecognized routing key,
    /// unparseable body, store failure — is caught here and converted into a
    /// 400 envelope carrying the failure's message.
    pub async fn handle(
        &self,
        routing_key: &str,
        path_params: &HashMap<String, String>,
        body: Option<&str>,
    ) -> GatewayResponse {
        match self.dispatch(routing_key, path_params, body).await {
            Ok(payload) => GatewayResponse::with_status(200, payload),
            Err(error) => {
                tracing::warn!(%routing_key, "request failed: {}", error);
                let message = JsonValue::String(error.to_string()).to_string();
                GatewayResponse::with_status(error.status_code(), message)
            }
        }
    }

    async fn dispatch(
        &self,
        routing_key: &str,
        path_params: &HashMap<String, String>,
        body: Option<&str>,
    ) -> Result<String, DispatchError> {
        let route = RouteKey::parse(routing_key)
            .ok_or_else(|| DispatchError::UnsupportedRoute(routing_key.to_string()))?;

        match route {
            RouteKey::DeleteItem => {
                let id = required_id(path_params)?;
                self.store.delete(id).await?;
                tracing::debug!(%id, "deleted item");
                Ok(JsonValue::String(format!("Deleted item {}", id)).to_string())
            }
            RouteKey::GetItem => {
                let id = required_id(path_params)?;
                let item = self.store.get(id).await?;
                tracing::debug!(%id, found = item.is_some(), "read item");
                // a miss serializes to `null`; not an error
                serialize(&item)
            }
            RouteKey::ListItems => {
                let items = self.store.scan_all().await?;
                tracing::debug!(count = items.len(), "scanned items");
                serialize(&items)
            }
            RouteKey::PutItem => {
                let raw = body.ok_or_else(|| {
                    DispatchError::MalformedBody("request body is required".to_string())
                })?;
                let item: Item = serde_json::from_str(raw)?;
                let id = item.id.clone();
                self.store.put(item).await?;
                tracing::debug!(%id, "put item");
                Ok(JsonValue::String(format!("Put item {}", id)).to_string())
            }
        }
    }
}

fn required_id(path_params: &HashMap<String, String>) -> Result<&str, DispatchError> {
    path_params
        .get("id")
        .map(String::as_str)
        .ok_or(DispatchError::MissingPathParam("id"))
}

fn serialize<T: Serialize>(value: &T) -> Result<String, DispatchError> {
    serde_json::to_string(value).map_err(|err| {
        DispatchError::Store(
            anyhow::Error::new(err).context("Failed to serialize response payload"),
        )
    })
}
