pub mod error;
pub mod handlers;
pub mod validated_json;

use crate::domain::ports::TariffProvider;
use crate::utils::error::Result;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn TariffProvider>,
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(provider: Arc<dyn TariffProvider>, expose_error_details: bool) -> Self {
        Self {
            provider,
            expose_error_details,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/orders", post(handlers::calculate_orders))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 綁定位址並提供服務，收到 Ctrl+C 後優雅關閉
pub async fn serve(bind_address: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!("🚀 Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
