use crate::config::Config;
use crate::dispatch::Dispatcher;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub config: Arc<Config>,
}
