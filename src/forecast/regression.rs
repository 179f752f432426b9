//! Linear regression over lag features, fitted with linfa.

use linfa::prelude::*;
use linfa_elasticnet::ElasticNet;
use linfa_linear::LinearRegression as OrdinaryLeastSquares;
use ndarray::{Array1, Array2, ArrayView1, Ix1};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Ridge penalty used when the least-squares system is singular.
const SINGULAR_FALLBACK_PENALTY: f64 = 1e-4;
const RIDGE_MAX_ITERATIONS: u32 = 10_000;
const RIDGE_TOLERANCE: f64 = 1e-8;

/// Something that can be fitted on a feature matrix and then predict.
pub trait Regressor {
    fn fit(&mut self, features: &[Vec<f64>], target: &[f64]) -> anyhow::Result<()>;

    fn predict_one(&self, row: &[f64]) -> anyhow::Result<f64>;

    fn predict(&self, rows: &[Vec<f64>]) -> anyhow::Result<Vec<f64>> {
        rows.iter().map(|r| self.predict_one(r)).collect()
    }
}

/// `y = intercept + coefficients · x`.
///
/// With `alpha == 0` this is ordinary least squares. Linearly dependent
/// columns make that system singular, in which case a tiny ridge penalty is
/// applied instead of failing the fit. A positive `alpha` is the elastic-net
/// ridge penalty (squared error scaled by `1 / 2n`). Only the fitted
/// parameters are kept, so a saved model stays plain JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub alpha: f64,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            ..Default::default()
        }
    }

    fn check_width(&self, width: usize) -> anyhow::Result<()> {
        if width != self.coefficients.len() {
            anyhow::bail!(
                "expected {} features, got {}",
                self.coefficients.len(),
                width
            );
        }
        Ok(())
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, features: &[Vec<f64>], target: &[f64]) -> anyhow::Result<()> {
        if features.is_empty() {
            anyhow::bail!("cannot fit on an empty training set");
        }
        if features.len() != target.len() {
            anyhow::bail!(
                "feature rows ({}) and targets ({}) differ in length",
                features.len(),
                target.len()
            );
        }
        if self.alpha.is_nan() || self.alpha < 0.0 {
            anyhow::bail!("alpha must be non-negative, got {}", self.alpha);
        }

        let records = to_records(features)?;
        let dataset = Dataset::new(records, Array1::from(target.to_vec()));

        let (intercept, params) = if self.alpha > 0.0 {
            fit_ridge(&dataset, self.alpha)?
        } else {
            match fit_least_squares(&dataset) {
                Ok(fitted) => fitted,
                Err(e) => {
                    warn!(error = %e, "Least squares is singular, falling back to ridge");
                    fit_ridge(&dataset, SINGULAR_FALLBACK_PENALTY)?
                }
            }
        };
        if !intercept.is_finite() || params.iter().any(|c| !c.is_finite()) {
            anyhow::bail!("solution is not finite");
        }

        self.intercept = intercept;
        self.coefficients = params.to_vec();
        Ok(())
    }

    fn predict_one(&self, row: &[f64]) -> anyhow::Result<f64> {
        self.check_width(row.len())?;
        let coefficients = ArrayView1::from(self.coefficients.as_slice());
        Ok(self.intercept + ArrayView1::from(row).dot(&coefficients))
    }

    fn predict(&self, rows: &[Vec<f64>]) -> anyhow::Result<Vec<f64>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        self.check_width(rows[0].len())?;
        let records = to_records(rows)?;
        let coefficients = ArrayView1::from(self.coefficients.as_slice());
        Ok((records.dot(&coefficients) + self.intercept).to_vec())
    }
}

fn to_records(rows: &[Vec<f64>]) -> anyhow::Result<Array2<f64>> {
    let width = rows.first().map_or(0, Vec::len);
    if width == 0 {
        anyhow::bail!("feature rows are empty");
    }
    if rows.iter().any(|r| r.len() != width) {
        anyhow::bail!("feature rows have inconsistent widths");
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(Array2::from_shape_vec((rows.len(), width), flat)?)
}

fn fit_least_squares(dataset: &Dataset<f64, f64, Ix1>) -> anyhow::Result<(f64, Array1<f64>)> {
    let fitted = OrdinaryLeastSquares::new().fit(dataset)?;
    let params = fitted.params();
    // A zero pivot can surface as NaN instead of an error.
    if !fitted.intercept().is_finite() || params.iter().any(|c| !c.is_finite()) {
        anyhow::bail!("least-squares solution is not finite");
    }
    Ok((fitted.intercept(), params.clone()))
}

fn fit_ridge(dataset: &Dataset<f64, f64, Ix1>, penalty: f64) -> anyhow::Result<(f64, Array1<f64>)> {
    let fitted = ElasticNet::ridge()
        .penalty(penalty)
        .max_iterations(RIDGE_MAX_ITERATIONS)
        .tolerance(RIDGE_TOLERANCE)
        .fit(dataset)?;
    Ok((fitted.intercept(), fitted.hyperplane().clone()))
}
