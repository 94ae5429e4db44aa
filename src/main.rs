mod api_doc;
mod config;
mod dispatch;
mod error;
mod handlers;
mod item;
mod memory;
mod routes;
mod spanner;
mod state;
mod store;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_doc::ApiDoc;
use config::Config;
use dispatch::Dispatcher;
use spanner::SpannerItemStore;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    tracing::info!("item-gateway starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store = SpannerItemStore::from_config(&config).await?;
    let dispatcher = Dispatcher::new(Arc::new(store));

    let state = AppState {
        dispatcher,
        config: Arc::new(config.clone()),
    };

    let app = Router::new()
        .route(routes::HEALTH, get(handlers::health_handler))
        .route(
            routes::ITEMS,
            get(handlers::list_handler).put(handlers::put_handler),
        )
        .route(
            routes::ITEM,
            get(handlers::get_handler).delete(handlers::delete_handler),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
