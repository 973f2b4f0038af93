//! Gradient-boosted regression over an additive ensemble of trees.
//!
//! A [`RegressionModel`] starts from the constant prediction chosen by a [`Loss`]
//! and grows one tree per boosting round. Each round computes the loss's negative
//! gradient (the pseudo-residuals) at the current predictions, appends it (and,
//! when the loss asks for them, the current predictions) to the feature [`Frame`]
//! as extra columns, and asks a [`TreeBuilder`] to fit a tree to it. The leaf
//! values of the new tree come from the loss's [`LeafValueFn`], which has the
//! learning rate baked in, so the ensemble's prediction is a plain sum.
//!
//! Fitting trees (split search, impurity measures) is left to the [`TreeBuilder`]
//! implementation. [`Regressor`] drives the boosting loop for a fixed number of
//! rounds.
//!
//! # Example
//!
//! ```
//! use kiln_boost::{
//!     Config, Error, Frame, LeafValueFn, LeastSquares, Regressor, Tree, TreeBuilder,
//! };
//! use kiln_parallel::Sequential;
//!
//! // Trees with a single leaf covering every row.
//! #[derive(Clone)]
//! struct LeafBuilder;
//! struct Leaf(f64);
//!
//! impl Tree for Leaf {
//!     fn predict_row(&self, _: &Frame, _: usize) -> f64 {
//!         self.0
//!     }
//! }
//!
//! impl TreeBuilder for LeafBuilder {
//!     type Tree = Leaf;
//!
//!     fn fit(
//!         &self,
//!         frame: &Frame,
//!         _: usize,
//!         _: &[usize],
//!         leaf_value: &LeafValueFn,
//!     ) -> Result<Leaf, Error> {
//!         let rows: Vec<usize> = (0..frame.rows()).collect();
//!         Ok(Leaf(leaf_value(frame, &rows)?))
//!     }
//! }
//!
//! let x = Frame::new(vec![(String::from("x"), vec![0.0, 1.0, 2.0, 3.0])]).unwrap();
//! let y = [1.0, 1.0, 5.0, 5.0];
//!
//! let config = Config { learning_rate: 0.5, rounds: 2 };
//! let regressor = Regressor::new(LeastSquares, LeafBuilder, Sequential, config).unwrap();
//! let model = regressor.fit(x.clone(), &y).unwrap();
//!
//! // The mean is already the best constant, so the leaves add nothing.
//! assert_eq!(model.ensemble().len(), 2);
//! assert_eq!(model.predict(&x, None), vec![3.0; 4]);
//! ```

use std::sync::Arc;
use thiserror::Error;

mod ensemble;
pub use ensemble::Ensemble;
mod frame;
pub use frame::{Frame, ORIGINAL_VALUES, PREDICTED_VALUES, PSEUDO_RESIDUALS};
mod loss;
pub use loss::{LeastAbsoluteDeviation, LeastSquares, Loss};
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
mod model;
pub use model::RegressionModel;
mod regressor;
pub use regressor::{Config, Regressor};

/// Errors that can occur while building frames or boosting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("invalid learning rate: {0}")]
    InvalidLearningRate(f64),
    #[error("empty target")]
    EmptyTarget,
    #[error("not implemented: {0}")]
    Unimplemented(&'static str),
    #[error("tree builder failed: {0}")]
    Builder(String),
}

/// Computes the value of a leaf from the rows of the augmented frame that fall
/// into it.
pub type LeafValueFn = Arc<dyn Fn(&Frame, &[usize]) -> Result<f64, Error> + Send + Sync>;

/// A fitted regression tree.
pub trait Tree: Send + Sync {
    /// Predicts the value for one row of `frame`.
    ///
    /// The frame has the feature columns the tree was fit on at the same indices.
    fn predict_row(&self, frame: &Frame, row: usize) -> f64;
}

/// Fits regression trees.
pub trait TreeBuilder: Send + Sync {
    /// The tree produced by [`fit`](Self::fit).
    type Tree: Tree;

    /// Fits a tree that predicts column `target` of `frame` from the columns in
    /// `features`, computing the value of each leaf with `leaf_value`.
    fn fit(
        &self,
        frame: &Frame,
        target: usize,
        features: &[usize],
        leaf_value: &LeafValueFn,
    ) -> Result<Self::Tree, Error>;
}
