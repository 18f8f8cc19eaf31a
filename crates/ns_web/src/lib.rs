use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod chart;
pub mod handlers;
pub mod page;
pub mod state;
pub mod view;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/sentiment", get(handlers::sentiment_report))
        .route("/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind `addr` and serve the dashboard until ctrl-c.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    info!(
        "Serving sentiment for {} articles with the {} model",
        state.pipeline.fetcher_name(),
        state.pipeline.model_name()
    );
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Dashboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use ns_core::{Error, Result, SentimentReport};
}
