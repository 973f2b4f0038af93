//! Loss functions that drive boosting.

use crate::{
    frame::{ORIGINAL_VALUES, PREDICTED_VALUES, PSEUDO_RESIDUALS},
    Error, Frame, LeafValueFn,
};
use std::{fmt::Debug, sync::Arc};

/// A differentiable loss.
pub trait Loss: Debug + Send + Sync {
    /// The negative gradient of the loss with respect to each prediction.
    fn negative_gradient(&self, y: &[f64], predictions: &[f64]) -> Vec<f64>;

    /// The constant prediction that minimizes the loss on `y`.
    fn initial_model(&self, y: &[f64]) -> f64;

    /// The leaf value function for trees fit under this loss, scaled by
    /// `learning_rate`.
    fn leaf_value_fn(&self, learning_rate: f64) -> LeafValueFn;

    /// Whether leaves need the [`ORIGINAL_VALUES`] column.
    fn needs_original_y_values(&self) -> bool {
        false
    }

    /// Whether leaves need the [`PREDICTED_VALUES`] column.
    fn needs_predicted_values(&self) -> bool {
        false
    }
}

/// Squared error, `(y - p)^2 / 2`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LeastSquares;

impl Loss for LeastSquares {
    fn negative_gradient(&self, y: &[f64], predictions: &[f64]) -> Vec<f64> {
        y.iter().zip(predictions).map(|(y, p)| y - p).collect()
    }

    fn initial_model(&self, y: &[f64]) -> f64 {
        mean(y.iter().copied())
    }

    fn leaf_value_fn(&self, learning_rate: f64) -> LeafValueFn {
        Arc::new(move |frame: &Frame, rows: &[usize]| -> Result<f64, Error> {
            let residuals = frame.require(PSEUDO_RESIDUALS)?;
            Ok(learning_rate * mean(rows.iter().map(|&row| residuals[row])))
        })
    }
}

/// Absolute error, `|y - p|`.
///
/// The gradient only carries the sign of the residual, so leaves are set to the
/// median residual of their rows instead of the mean of the fitted target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LeastAbsoluteDeviation;

impl Loss for LeastAbsoluteDeviation {
    fn negative_gradient(&self, y: &[f64], predictions: &[f64]) -> Vec<f64> {
        y.iter()
            .zip(predictions)
            .map(|(y, p)| {
                let residual = y - p;
                if residual > 0.0 {
                    1.0
                } else if residual < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            })
            .collect()
    }

    fn initial_model(&self, y: &[f64]) -> f64 {
        median(y.to_vec())
    }

    fn leaf_value_fn(&self, learning_rate: f64) -> LeafValueFn {
        Arc::new(move |frame: &Frame, rows: &[usize]| -> Result<f64, Error> {
            let original = frame.require(ORIGINAL_VALUES)?;
            let predicted = frame.require(PREDICTED_VALUES)?;
            let residuals = rows
                .iter()
                .map(|&row| original[row] - predicted[row])
                .collect();
            Ok(learning_rate * median(residuals))
        })
    }

    fn needs_original_y_values(&self) -> bool {
        true
    }

    fn needs_predicted_values(&self) -> bool {
        true
    }
}

/// Mean of `values`, or 0 if there are none.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}

/// Median of `values` (the mean of the middle pair for even counts), or 0 if
/// there are none.
fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}
