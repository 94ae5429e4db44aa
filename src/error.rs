use serde::{Deserialize, Serialize};
use std::fmt;

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Failure raised inside the dispatch boundary.
///
/// Every kind surfaces to the caller the same way — status 400 with the
/// failure's message as the body — but the kinds stay distinct here so the
/// status mapping could diverge later without restructuring the dispatch
/// logic.
#[derive(Debug)]
pub enum DispatchError {
    /// Routing key outside the four recognized values
    UnsupportedRoute(String),
    /// Upsert body absent or not parseable as an item payload
    MalformedBody(String),
    /// Single-item route invoked without an `id` path parameter
    MissingPathParam(&'static str),
    /// The backing store operation itself failed
    Store(anyhow::Error),
}

impl DispatchError {
    /// Status code for the response envelope. All handled failures are
    /// reported as client errors.
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::UnsupportedRoute(_)
            | DispatchError::MalformedBody(_)
            | DispatchError::MissingPathParam(_)
            | DispatchError::Store(_) => 400,
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnsupportedRoute(key) => {
                write!(f, "Unsupported route: \"{}\"", key)
            }
            DispatchError::MalformedBody(msg) => {
                write!(f, "Malformed request body: {}", msg)
            }
            DispatchError::MissingPathParam(name) => {
                write!(f, "Missing path parameter \"{}\"", name)
            }
            DispatchError::Store(err) => write!(f, "{:#}", err),
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::MalformedBody(err.to_string())
    }
}

impl From<anyhow::Error> for DispatchError {
    fn from(err: anyhow::Error) -> Self {
        DispatchError::Store(err)
    }
}
