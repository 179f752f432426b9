//! HTTP surface: the scrape, train and predict endpoints.

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::infra::store::ModelStore;
use crate::services::air_quality_api::AirQualityApi;

pub mod error;
pub mod models;
pub mod routes;

pub use error::AppError;

/// Shared, read-only collaborators of every handler.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn AirQualityApi>,
    pub store: Arc<dyn ModelStore>,
    pub ridge_alpha: f64,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_handler))
        .route("/scrape_data", post(routes::scrape_data))
        .route("/scrape_data/", post(routes::scrape_data))
        .route("/train_models", post(routes::train_models))
        .route("/train_models/", post(routes::train_models))
        .route("/predict_values", post(routes::predict_values))
        .route("/predict_values/", post(routes::predict_values))
        .with_state(Arc::new(state))
}

pub async fn run_http_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}
