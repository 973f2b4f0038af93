//! Immutable, column-major tables of `f64` features.

use crate::Error;
use std::sync::Arc;

/// Column holding the original target values, for losses that need them.
pub const ORIGINAL_VALUES: &str = "__originalValues";

/// Column holding the pseudo-residuals a boosting round fits a tree to.
pub const PSEUDO_RESIDUALS: &str = "__pseudoResiduals";

/// Column holding the current predictions, for losses that need them.
pub const PREDICTED_VALUES: &str = "__predictedValues";

#[derive(Clone, Debug, PartialEq)]
struct Column {
    name: Arc<str>,
    values: Arc<[f64]>,
}

/// An immutable table of named `f64` columns of equal length.
///
/// Clones share column storage, so [`add_column`](Self::add_column) only copies
/// the new column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    columns: Vec<Column>,
    rows: usize,
}

impl Frame {
    /// Creates a frame from `(name, values)` pairs.
    pub fn new(columns: Vec<(String, Vec<f64>)>) -> Result<Self, Error> {
        columns
            .into_iter()
            .try_fold(Self::default(), |frame, (name, values)| {
                frame.add_column(&name, values)
            })
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns.len())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    /// The values of the column at `index`.
    pub fn column(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(|column| &*column.values)
    }

    /// The values of the column called `name`.
    pub fn column_by_name(&self, name: &str) -> Option<&[f64]> {
        self.index_of(name).and_then(|index| self.column(index))
    }

    /// Like [`column_by_name`](Self::column_by_name), failing with
    /// [`Error::MissingColumn`].
    pub fn require(&self, name: &str) -> Result<&[f64], Error> {
        self.column_by_name(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// The index of the column called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| &*column.name == name)
    }

    /// The name of the column at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|column| &*column.name)
    }

    /// The value at `(row, column)`.
    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.column(column)?.get(row).copied()
    }

    /// Returns a new frame with `values` appended as column `name`.
    ///
    /// The first column of an empty frame sets the number of rows; later columns
    /// must match it.
    pub fn add_column(&self, name: &str, values: Vec<f64>) -> Result<Self, Error> {
        if !self.columns.is_empty() && values.len() != self.rows {
            return Err(Error::LengthMismatch {
                expected: self.rows,
                got: values.len(),
            });
        }
        if self.index_of(name).is_some() {
            return Err(Error::DuplicateColumn(name.to_string()));
        }
        let mut columns = self.columns.clone();
        let rows = values.len();
        columns.push(Column {
            name: Arc::from(name),
            values: Arc::from(values),
        });
        Ok(Self { columns, rows })
    }
}
