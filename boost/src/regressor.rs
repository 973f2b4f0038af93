//! Driver for a fixed number of boosting rounds.

use crate::{model::validate_learning_rate, Error, Frame, Loss, RegressionModel, TreeBuilder};
use kiln_parallel::Strategy;
use tracing::{debug, trace};

/// Configuration for [`Regressor`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Scale applied to every leaf value, in `(0, 1]`.
    pub learning_rate: f64,

    /// Number of boosting rounds (trees) to fit.
    pub rounds: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            rounds: 100,
        }
    }
}

/// Fits [`RegressionModel`]s by boosting from the loss's initial model.
#[derive(Clone, Debug)]
pub struct Regressor<L, B, S> {
    loss: L,
    builder: B,
    strategy: S,
    config: Config,
}

impl<L, B, S> Regressor<L, B, S>
where
    L: Loss + Clone,
    B: TreeBuilder + Clone,
    S: Strategy,
{
    /// Creates a regressor, failing if the learning rate is outside `(0, 1]`.
    pub fn new(loss: L, builder: B, strategy: S, config: Config) -> Result<Self, Error> {
        validate_learning_rate(config.learning_rate)?;
        Ok(Self {
            loss,
            builder,
            strategy,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fits a model to `y` using every column of `x` as a feature.
    ///
    /// Predictions are carried from one round to the next, so each round only
    /// evaluates the tree it just added.
    pub fn fit(&self, x: Frame, y: &[f64]) -> Result<RegressionModel<L, B, S>, Error> {
        let mut model = RegressionModel::initial(
            x,
            y,
            self.loss.clone(),
            self.builder.clone(),
            self.config.learning_rate,
            self.strategy.clone(),
        )?;
        let mut previous: Option<Vec<f64>> = None;
        for round in 0..self.config.rounds {
            let (residuals, predictions) =
                model.pseudo_residuals_and_predictions(previous.as_deref())?;
            trace!(round, loss = mean_abs(&residuals), "fitting tree");
            model = model.boost(&predictions, &residuals)?;
            previous = Some(predictions);
        }
        debug!(
            rounds = self.config.rounds,
            learning_rate = self.config.learning_rate,
            "fit model"
        );
        Ok(model)
    }
}

fn mean_abs(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64
}
