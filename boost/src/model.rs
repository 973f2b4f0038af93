//! Immutable snapshots of a boosted regression model.

use crate::{
    frame::{ORIGINAL_VALUES, PREDICTED_VALUES, PSEUDO_RESIDUALS},
    Ensemble, Error, Frame, Loss, Tree, TreeBuilder,
};
use kiln_parallel::Strategy;
use std::sync::Arc;
use tracing::debug;

/// Fails unless `0 < learning_rate <= 1`.
pub(crate) fn validate_learning_rate(learning_rate: f64) -> Result<(), Error> {
    if learning_rate > 0.0 && learning_rate <= 1.0 {
        return Ok(());
    }
    Err(Error::InvalidLearningRate(learning_rate))
}

fn check_len(expected: usize, got: usize) -> Result<(), Error> {
    if expected != got {
        return Err(Error::LengthMismatch { expected, got });
    }
    Ok(())
}

/// A gradient-boosted regression model fit to a training frame.
///
/// Every boosting round produces a new model; earlier models remain valid and
/// share their trees with later ones.
pub struct RegressionModel<L, B: TreeBuilder, S> {
    ensemble: Ensemble<B::Tree>,
    x: Frame,
    dimensions: Arc<[usize]>,
    y: Arc<[f64]>,
    loss: Arc<L>,
    builder: Arc<B>,
    learning_rate: f64,
    strategy: S,
}

impl<L, B: TreeBuilder, S: Clone> Clone for RegressionModel<L, B, S> {
    fn clone(&self) -> Self {
        Self {
            ensemble: self.ensemble.clone(),
            x: self.x.clone(),
            dimensions: self.dimensions.clone(),
            y: self.y.clone(),
            loss: self.loss.clone(),
            builder: self.builder.clone(),
            learning_rate: self.learning_rate,
            strategy: self.strategy.clone(),
        }
    }
}

impl<L: Loss, B: TreeBuilder, S: Strategy> RegressionModel<L, B, S> {
    /// The model before any boosting round: the loss's constant prediction for `y`.
    ///
    /// Every column of `x` is a feature. If the loss needs the original targets,
    /// they are kept alongside the features as [`ORIGINAL_VALUES`].
    pub fn initial(
        x: Frame,
        y: &[f64],
        loss: L,
        builder: B,
        learning_rate: f64,
        strategy: S,
    ) -> Result<Self, Error> {
        validate_learning_rate(learning_rate)?;
        if y.is_empty() {
            return Err(Error::EmptyTarget);
        }
        check_len(x.rows(), y.len())?;

        let ensemble = Ensemble::new(loss.initial_model(y));
        let dimensions: Arc<[usize]> = (0..x.columns()).collect();
        let x = if loss.needs_original_y_values() {
            x.add_column(ORIGINAL_VALUES, y.to_vec())?
        } else {
            x
        };
        debug!(
            rows = y.len(),
            features = dimensions.len(),
            base = ensemble.base(),
            "initialized model"
        );
        Ok(Self {
            ensemble,
            x,
            dimensions,
            y: Arc::from(y),
            loss: Arc::new(loss),
            builder: Arc::new(builder),
            learning_rate,
            strategy,
        })
    }

    /// Predicts every row of `frame` with the first `n_estimators` trees (all
    /// of them if `None`).
    pub fn predict(&self, frame: &Frame, n_estimators: Option<usize>) -> Vec<f64> {
        self.ensemble.predict(&self.strategy, frame, n_estimators)
    }

    /// Updates the predictions of the previous model on `frame` with the tree
    /// added by the last boosting round.
    ///
    /// Returns `previous` unchanged if no round has run yet.
    pub fn predict_with_previous(&self, previous: &[f64], frame: &Frame) -> Result<Vec<f64>, Error> {
        check_len(frame.rows(), previous.len())?;
        let Some(tree) = self.ensemble.last() else {
            return Ok(previous.to_vec());
        };
        Ok(self
            .strategy
            .map_collect_vec(0..frame.rows(), |row| previous[row] + tree.predict_row(frame, row)))
    }

    /// The pseudo-residuals and predictions of this model on its training frame.
    ///
    /// Pass the predictions of the previous model to only evaluate the newest tree.
    pub fn pseudo_residuals_and_predictions(
        &self,
        previous: Option<&[f64]>,
    ) -> Result<(Vec<f64>, Vec<f64>), Error> {
        let predictions = match previous {
            Some(previous) => self.predict_with_previous(previous, &self.x)?,
            None => self.predict(&self.x, None),
        };
        let residuals = self.loss.negative_gradient(&self.y, &predictions);
        Ok((residuals, predictions))
    }

    /// Runs one boosting round, returning the model with one more tree.
    pub fn boost(&self, predictions: &[f64], pseudo_residuals: &[f64]) -> Result<Self, Error> {
        check_len(self.x.rows(), predictions.len())?;
        check_len(self.x.rows(), pseudo_residuals.len())?;

        let target = self.x.columns();
        let mut frame = self.x.add_column(PSEUDO_RESIDUALS, pseudo_residuals.to_vec())?;
        if self.loss.needs_predicted_values() {
            frame = frame.add_column(PREDICTED_VALUES, predictions.to_vec())?;
        }
        let leaf_value = self.loss.leaf_value_fn(self.learning_rate);
        let tree = self
            .builder
            .fit(&frame, target, &self.dimensions, &leaf_value)?;

        let ensemble = self.ensemble.push(tree);
        debug!(trees = ensemble.len(), "boosted model");
        Ok(Self {
            ensemble,
            ..self.clone()
        })
    }

    /// Goodness of fit on `x` against `y`.
    ///
    /// Not supported; always fails with [`Error::Unimplemented`].
    pub fn score(&self, _x: &Frame, _y: &[f64]) -> Result<f64, Error> {
        Err(Error::Unimplemented("score"))
    }

    /// Per-feature importances.
    ///
    /// Not supported; always fails with [`Error::Unimplemented`].
    pub fn feature_importances(&self) -> Result<Vec<f64>, Error> {
        Err(Error::Unimplemented("feature_importances"))
    }
}

impl<L, B: TreeBuilder, S> RegressionModel<L, B, S> {
    pub fn ensemble(&self) -> &Ensemble<B::Tree> {
        &self.ensemble
    }

    /// The training frame, including [`ORIGINAL_VALUES`] if the loss needs it.
    pub fn frame(&self) -> &Frame {
        &self.x
    }

    /// Indices of the feature columns of [`frame`](Self::frame).
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}
