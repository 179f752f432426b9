//! Per-pollutant forecasting: lag features, a linear regressor, and the
//! train / predict workflows on top of a [`ModelStore`](crate::infra::store::ModelStore).

pub mod features;
pub mod metrics;
pub mod predictor;
pub mod regression;
pub mod trainer;

use thiserror::Error;

use crate::infra::store::StoreError;
use crate::types::Pollutant;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("No measurements were supplied")]
    EmptyMeasurements,

    #[error("Not enough history to train the {pollutant} model ({eligible} usable rows)")]
    InsufficientHistory { pollutant: Pollutant, eligible: usize },

    #[error("Failed to fit the {pollutant} model: {reason}")]
    Fit { pollutant: Pollutant, reason: String },

    #[error("Failed to encode the {0} model")]
    ModelEncode(Pollutant, #[source] serde_json::Error),

    #[error("Stored {0} model is unreadable")]
    ModelDecode(Pollutant, #[source] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ForecastError {
    /// True when the caller's input, not the server, caused the failure.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ForecastError::EmptyMeasurements | ForecastError::InsufficientHistory { .. }
        )
    }
}
