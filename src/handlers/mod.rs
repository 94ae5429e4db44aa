pub mod delete;
pub mod fallback;
pub mod get;
pub mod health;
pub mod list;
pub mod put;

pub use delete::delete_handler;
pub use fallback::fallback_handler;
pub use get::get_handler;
pub use health::health_handler;
pub use list::list_handler;
pub use put::put_handler;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::dispatch::GatewayResponse;

/// The dispatcher's envelope maps straight onto an HTTP response; the
/// handlers below only adapt extractor output into dispatcher inputs.
impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::config::Config;
    use crate::dispatch::Dispatcher;
    use crate::memory::MemoryStore;
    use crate::state::AppState;

    /// A dispatcher over a fresh in-memory store, plus the store handle for
    /// direct assertions.
    pub fn test_state() -> (Arc<MemoryStore>, AppState) {
        let store = Arc::new(MemoryStore::new());
        let config = Config {
            spanner_emulator_host: None,
            spanner_project: "test-project".to_string(),
            spanner_instance: "test-instance".to_string(),
            spanner_database: "test-database".to_string(),
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
        };
        let state = AppState {
            dispatcher: Dispatcher::new(store.clone()),
            config: Arc::new(config),
        };
        (store, state)
    }
}
