//! Lag-feature construction for a single pollutant series.

use crate::types::{MeasurementRow, Pollutant};

/// Number of prior hourly values used as features.
pub const LAG_HOURS: usize = 24;

/// Share of eligible rows (oldest first) that goes to the training split.
pub const TRAIN_FRACTION: f64 = 0.95;

/// Column names of the feature matrix, `1_Hours_Ago` through `24_Hours_Ago`.
pub fn lag_column_names() -> Vec<String> {
    (1..=LAG_HOURS).map(|i| format!("{i}_Hours_Ago")).collect()
}

/// Feature matrix with its aligned target vector.
///
/// `features[k][i - 1]` is the value `i` rows before the row whose value is
/// `target[k]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaggedFeatures {
    pub features: Vec<Vec<f64>>,
    pub target: Vec<f64>,
}

impl LaggedFeatures {
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Splits chronologically: the first `round(len * TRAIN_FRACTION)` rows
    /// train, the remainder test. Order is preserved on both sides.
    pub fn train_test_split(mut self) -> (LaggedFeatures, LaggedFeatures) {
        let train_len = train_len(self.len());
        let test = LaggedFeatures {
            features: self.features.split_off(train_len),
            target: self.target.split_off(train_len),
        };
        (self, test)
    }
}

pub(crate) fn train_len(eligible: usize) -> usize {
    ((eligible as f64 * TRAIN_FRACTION).round() as usize).min(eligible)
}

/// Builds the lagged feature matrix for `pollutant` from time-ordered rows.
///
/// A row is kept only when its own value and all 24 earlier values are
/// present, so the first 24 rows never appear and a missing value knocks out
/// every row that would read it.
pub fn lag_features(rows: &[MeasurementRow], pollutant: Pollutant) -> LaggedFeatures {
    let series: Vec<Option<f64>> = rows.iter().map(|r| r.value(pollutant)).collect();
    let mut out = LaggedFeatures::default();

    for t in LAG_HOURS..series.len() {
        let Some(value) = series[t] else {
            continue;
        };
        let lags: Option<Vec<f64>> = (1..=LAG_HOURS).map(|i| series[t - i]).collect();
        if let Some(lags) = lags {
            out.features.push(lags);
            out.target.push(value);
        }
    }

    out
}

/// Feature row for forecasting the hour after the last row.
///
/// Returns `None` unless the trailing 24 rows all carry a value.
pub fn prediction_row(rows: &[MeasurementRow], pollutant: Pollutant) -> Option<Vec<f64>> {
    if rows.len() < LAG_HOURS {
        return None;
    }
    (1..=LAG_HOURS)
        .map(|i| rows[rows.len() - i].value(pollutant))
        .collect()
}
