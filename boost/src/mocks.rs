//! A one-split tree builder for exercising the boosting loop.

use crate::{Error, Frame, LeafValueFn, Tree, TreeBuilder};

/// Fits [`Stump`]s: the single threshold split that minimizes the squared error
/// of the target column.
#[derive(Clone, Copy, Debug, Default)]
pub struct StumpBuilder;

/// A tree with at most one split.
#[derive(Clone, Debug, PartialEq)]
pub struct Stump {
    /// `(feature, threshold)`; rows with `value <= threshold` go left. `None` if
    /// no feature separates the rows.
    pub split: Option<(usize, f64)>,
    pub left: f64,
    pub right: f64,
}

impl Tree for Stump {
    fn predict_row(&self, frame: &Frame, row: usize) -> f64 {
        let Some((feature, threshold)) = self.split else {
            return self.left;
        };
        match frame.value(row, feature) {
            Some(value) if value > threshold => self.right,
            _ => self.left,
        }
    }
}

fn column(frame: &Frame, index: usize) -> Result<&[f64], Error> {
    frame
        .column(index)
        .ok_or_else(|| Error::Builder(format!("no column at index {index}")))
}

impl TreeBuilder for StumpBuilder {
    type Tree = Stump;

    fn fit(
        &self,
        frame: &Frame,
        target: usize,
        features: &[usize],
        leaf_value: &LeafValueFn,
    ) -> Result<Stump, Error> {
        let y = column(frame, target)?;
        let rows: Vec<usize> = (0..frame.rows()).collect();
        let n = rows.len() as f64;
        let total: f64 = y.iter().sum();
        let total_sq: f64 = y.iter().map(|v| v * v).sum();

        // (squared error, feature, threshold)
        let mut best: Option<(f64, usize, f64)> = None;
        for &feature in features {
            let values = column(frame, feature)?;
            let mut order = rows.clone();
            order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

            let (mut sum, mut sq) = (0.0, 0.0);
            for (i, pair) in order.windows(2).enumerate() {
                let (lo, hi) = (values[pair[0]], values[pair[1]]);
                sum += y[pair[0]];
                sq += y[pair[0]] * y[pair[0]];
                if lo == hi {
                    continue;
                }
                let left = (i + 1) as f64;
                let right = n - left;
                let error = (sq - sum * sum / left)
                    + ((total_sq - sq) - (total - sum) * (total - sum) / right);
                if best.map_or(true, |(best, _, _)| error < best) {
                    best = Some((error, feature, lo + (hi - lo) / 2.0));
                }
            }
        }

        let Some((_, feature, threshold)) = best else {
            let value = leaf_value(frame, &rows)?;
            return Ok(Stump {
                split: None,
                left: value,
                right: value,
            });
        };
        let values = column(frame, feature)?;
        let (left, right): (Vec<usize>, Vec<usize>) =
            rows.iter().partition(|&&row| values[row] <= threshold);
        Ok(Stump {
            split: Some((feature, threshold)),
            left: leaf_value(frame, &left)?,
            right: leaf_value(frame, &right)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{frame::PSEUDO_RESIDUALS, LeastSquares, Loss};

    fn frame(x: Vec<f64>, residuals: Vec<f64>) -> Frame {
        Frame::default()
            .add_column("x", x)
            .unwrap()
            .add_column(PSEUDO_RESIDUALS, residuals)
            .unwrap()
    }

    #[test]
    fn test_finds_best_threshold() {
        let frame = frame(vec![3.0, 0.0, 2.0, 1.0], vec![4.0, -1.0, 4.0, -1.0]);
        let stump = StumpBuilder
            .fit(&frame, 1, &[0], &LeastSquares.leaf_value_fn(1.0))
            .unwrap();
        assert_eq!(
            stump,
            Stump {
                split: Some((0, 1.5)),
                left: -1.0,
                right: 4.0,
            }
        );
        assert_eq!(stump.predict_row(&frame, 0), 4.0);
        assert_eq!(stump.predict_row(&frame, 1), -1.0);
    }

    #[test]
    fn test_constant_feature_is_single_leaf() {
        let frame = frame(vec![1.0; 3], vec![1.0, 2.0, 6.0]);
        let stump = StumpBuilder
            .fit(&frame, 1, &[0], &LeastSquares.leaf_value_fn(0.5))
            .unwrap();
        assert_eq!(stump.split, None);
        assert_eq!(stump.left, 1.5);
        assert_eq!(stump.predict_row(&frame, 2), 1.5);
    }

    #[test]
    fn test_missing_column() {
        let frame = frame(vec![1.0], vec![1.0]);
        assert_eq!(
            StumpBuilder.fit(&frame, 5, &[0], &LeastSquares.leaf_value_fn(1.0)),
            Err(Error::Builder(String::from("no column at index 5")))
        );
    }
}
