use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::ForecastError;
use super::features::{LAG_HOURS, lag_column_names, lag_features};
use super::metrics::{mean_absolute_error, mean_squared_error};
use super::regression::{LinearRegression, Regressor};
use crate::infra::store::ModelStore;
use crate::types::{MeasurementRow, Pollutant};

/// What gets written to the model store for one pollutant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedModel {
    pub pollutant: String,
    pub trained_at: DateTime<Utc>,
    pub lag_hours: usize,
    pub feature_names: Vec<String>,
    pub train_rows: usize,
    pub regressor: LinearRegression,
}

impl SavedModel {
    pub fn encode(&self, pollutant: Pollutant) -> Result<Vec<u8>, ForecastError> {
        serde_json::to_vec(self).map_err(|e| ForecastError::ModelEncode(pollutant, e))
    }

    pub fn decode(pollutant: Pollutant, bytes: &[u8]) -> Result<Self, ForecastError> {
        serde_json::from_slice(bytes).map_err(|e| ForecastError::ModelDecode(pollutant, e))
    }
}

/// Fit and evaluation summary for one pollutant.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub pollutant: Pollutant,
    pub train_rows: usize,
    pub test_rows: usize,
    pub mse: Option<f64>,
    pub mae: Option<f64>,
}

/// Fits one model per pollutant and writes them to a [`ModelStore`].
pub struct Trainer<'a> {
    store: &'a dyn ModelStore,
    alpha: f64,
}

impl<'a> Trainer<'a> {
    pub fn new(store: &'a dyn ModelStore, alpha: f64) -> Self {
        Self { store, alpha }
    }

    /// Trains all pollutant models from time-ordered `rows`.
    ///
    /// Nothing is written unless every model fitted, so a failure leaves the
    /// previously stored models in place.
    #[tracing::instrument(skip(self, rows), fields(rows = rows.len()))]
    pub fn train(&self, rows: &[MeasurementRow]) -> Result<Vec<TrainingReport>, ForecastError> {
        if rows.is_empty() {
            return Err(ForecastError::EmptyMeasurements);
        }

        let mut fitted = Vec::with_capacity(Pollutant::ALL.len());
        for pollutant in Pollutant::ALL {
            fitted.push(self.fit_one(rows, pollutant)?);
        }

        let mut reports = Vec::with_capacity(fitted.len());
        for (model, report) in fitted {
            let bytes = model.encode(report.pollutant)?;
            self.store.put(report.pollutant.as_str(), &bytes)?;
            reports.push(report);
        }

        info!(models = reports.len(), "Models trained and stored");
        Ok(reports)
    }

    fn fit_one(
        &self,
        rows: &[MeasurementRow],
        pollutant: Pollutant,
    ) -> Result<(SavedModel, TrainingReport), ForecastError> {
        let data = lag_features(rows, pollutant);
        let eligible = data.len();
        let (train, test) = data.train_test_split();
        if train.is_empty() {
            return Err(ForecastError::InsufficientHistory { pollutant, eligible });
        }

        let mut regressor = LinearRegression::new(self.alpha);
        regressor
            .fit(&train.features, &train.target)
            .map_err(|e| ForecastError::Fit {
                pollutant,
                reason: e.to_string(),
            })?;

        let (mse, mae) = if test.is_empty() {
            warn!(%pollutant, "Test split is empty, skipping evaluation");
            (None, None)
        } else {
            let predicted = regressor
                .predict(&test.features)
                .map_err(|e| ForecastError::Fit {
                    pollutant,
                    reason: e.to_string(),
                })?;
            (
                mean_squared_error(&test.target, &predicted),
                mean_absolute_error(&test.target, &predicted),
            )
        };

        info!(
            %pollutant,
            train_rows = train.len(),
            test_rows = test.len(),
            mse,
            mae,
            "Model evaluated"
        );

        let model = SavedModel {
            pollutant: pollutant.to_string(),
            trained_at: Utc::now(),
            lag_hours: LAG_HOURS,
            feature_names: lag_column_names(),
            train_rows: train.len(),
            regressor,
        };
        let report = TrainingReport {
            pollutant,
            train_rows: train.len(),
            test_rows: test.len(),
            mse,
            mae,
        };
        Ok((model, report))
    }
}
