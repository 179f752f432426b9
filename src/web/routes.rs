use axum::{Json, body::Bytes, extract::State};
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::info;

use crate::forecast::predictor::Predictor;
use crate::forecast::trainer::Trainer;
use crate::services::scraper::{ScrapeResponse, scrape};
use crate::web::models::{MeasurementsRequest, PredictResponse, ScrapeRequest, TrainResponse};
use crate::web::{AppError, AppState};

/// Decodes a JSON body regardless of its `Content-Type` header.
fn json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    Ok(serde_json::from_slice(body)?)
}

pub async fn scrape_data(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ScrapeResponse>, AppError> {
    let request: ScrapeRequest = json_body(&body)?;
    let response = scrape(state.api.as_ref(), request.stations_payload, Utc::now()).await;
    Ok(Json(response))
}

pub async fn train_models(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TrainResponse>, AppError> {
    let rows = json_body::<MeasurementsRequest>(&body)?.into_rows();
    info!(rows = rows.len(), "Training request received");

    let store = state.store.clone();
    let alpha = state.ridge_alpha;
    tokio::task::spawn_blocking(move || Trainer::new(store.as_ref(), alpha).train(&rows))
        .await?
        .map_err(AppError::Training)?;

    Ok(Json(TrainResponse {
        status: "success".to_string(),
        message: "Models trained successfully".to_string(),
    }))
}

pub async fn predict_values(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictResponse>, AppError> {
    let rows = json_body::<MeasurementsRequest>(&body)?.into_rows();
    info!(rows = rows.len(), "Prediction request received");

    let store = state.store.clone();
    let predictions =
        tokio::task::spawn_blocking(move || Predictor::new(store.as_ref()).predict(&rows))
            .await?
            .map_err(AppError::Prediction)?;

    Ok(Json(PredictResponse {
        status: "success".to_string(),
        predictions,
    }))
}
