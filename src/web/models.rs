//! Request and response bodies of the HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::forecast::predictor::Predictions;
use crate::services::scraper::StationsPayload;
use crate::types::MeasurementRow;

#[derive(Debug, Default, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub stations_payload: Option<StationsPayload>,
}

/// Body of both the training and the prediction request.
#[derive(Debug, Default, Deserialize)]
pub struct MeasurementsRequest {
    #[serde(default)]
    pub measurements_payload: Option<Vec<MeasurementRow>>,
}

impl MeasurementsRequest {
    pub fn into_rows(self) -> Vec<MeasurementRow> {
        self.measurements_payload.unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub status: String,
    pub predictions: Predictions,
}
