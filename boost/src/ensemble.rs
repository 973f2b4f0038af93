//! Additive ensembles of regression trees.

use crate::{Frame, Tree};
use kiln_parallel::Strategy;
use std::sync::Arc;

/// A constant base prediction plus the sum of a sequence of trees.
///
/// Ensembles are immutable: [`push`](Self::push) returns a new ensemble that
/// shares the existing trees.
#[derive(Debug)]
pub struct Ensemble<T> {
    base: f64,
    trees: Vec<Arc<T>>,
}

impl<T> Clone for Ensemble<T> {
    fn clone(&self) -> Self {
        Self {
            base: self.base,
            trees: self.trees.clone(),
        }
    }
}

impl<T> Ensemble<T> {
    /// An ensemble with no trees that predicts `base` everywhere.
    pub fn new(base: f64) -> Self {
        Self {
            base,
            trees: Vec::new(),
        }
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    /// Number of trees.
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// The tree at `index`, in the order trees were added.
    pub fn tree(&self, index: usize) -> Option<&T> {
        self.trees.get(index).map(|tree| &**tree)
    }

    /// The most recently added tree.
    pub fn last(&self) -> Option<&T> {
        self.trees.last().map(|tree| &**tree)
    }

    /// Returns a new ensemble with `tree` appended.
    pub fn push(&self, tree: T) -> Self {
        let mut trees = self.trees.clone();
        trees.push(Arc::new(tree));
        Self {
            base: self.base,
            trees,
        }
    }
}

impl<T: Tree> Ensemble<T> {
    /// Predicts every row of `frame` using the base and the first `n_estimators`
    /// trees (all of them if `None`).
    pub fn predict<S: Strategy>(
        &self,
        strategy: &S,
        frame: &Frame,
        n_estimators: Option<usize>,
    ) -> Vec<f64> {
        let n = n_estimators.map_or(self.trees.len(), |n| n.min(self.trees.len()));
        let trees = &self.trees[..n];
        strategy.map_collect_vec(0..frame.rows(), |row| {
            trees
                .iter()
                .fold(self.base, |sum, tree| sum + tree.predict_row(frame, row))
        })
    }
}
