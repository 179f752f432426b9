use std::collections::BTreeMap;

use tracing::{debug, info};

use super::ForecastError;
use super::features::prediction_row;
use super::regression::Regressor;
use super::trainer::SavedModel;
use crate::infra::store::ModelStore;
use crate::types::{MeasurementRow, Pollutant};

/// Next-hour forecast per pollutant name; `None` where the trailing 24 hours
/// were incomplete.
pub type Predictions = BTreeMap<String, Option<f64>>;

/// Loads the stored models and forecasts the hour after the latest row.
pub struct Predictor<'a> {
    store: &'a dyn ModelStore,
}

impl<'a> Predictor<'a> {
    pub fn new(store: &'a dyn ModelStore) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self, rows), fields(rows = rows.len()))]
    pub fn predict(&self, rows: &[MeasurementRow]) -> Result<Predictions, ForecastError> {
        if rows.is_empty() {
            return Err(ForecastError::EmptyMeasurements);
        }

        let mut models = Vec::with_capacity(Pollutant::ALL.len());
        for pollutant in Pollutant::ALL {
            let bytes = self.store.get(pollutant.as_str())?;
            models.push((pollutant, SavedModel::decode(pollutant, &bytes)?));
        }

        let mut predictions = Predictions::new();
        for (pollutant, model) in models {
            let value = match prediction_row(rows, pollutant) {
                Some(row) => Some(model.regressor.predict_one(&row).map_err(|e| {
                    ForecastError::Fit {
                        pollutant,
                        reason: e.to_string(),
                    }
                })?),
                None => {
                    debug!(%pollutant, "Trailing window incomplete, no forecast");
                    None
                }
            };
            predictions.insert(pollutant.to_string(), value);
        }

        info!(
            forecasts = predictions.values().filter(|v| v.is_some()).count(),
            "Predictions computed"
        );
        Ok(predictions)
    }
}
