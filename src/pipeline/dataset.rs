//! Immutable numeric dataset of outputs and candidate features
//!
//! Rows are variables, columns are data points. The row position is the
//! variable's global index and never changes, whatever sampling or
//! shuffling a sweep applies.

use rand::seq::{index, SliceRandom};
use rand::Rng;

use super::error::{PfaError, PfaResult};

/// A (outputs + features) x (data points) matrix with optional row names
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    rows: Vec<Vec<f64>>,
    names: Vec<String>,
}

impl Dataset {
    /// Build a dataset from rows, naming them `row_0`, `row_1`, ...
    pub fn new(rows: Vec<Vec<f64>>) -> PfaResult<Self> {
        let names = (0..rows.len()).map(|i| format!("row_{}", i)).collect();
        Self::with_names(rows, names)
    }

    /// Build a dataset from rows with explicit names (one per row)
    pub fn with_names(rows: Vec<Vec<f64>>, names: Vec<String>) -> PfaResult<Self> {
        if rows.is_empty() {
            return Err(PfaError::InvalidDataset("dataset has no rows".to_string()));
        }
        if names.len() != rows.len() {
            return Err(PfaError::InvalidDataset(format!(
                "{} names given for {} rows",
                names.len(),
                rows.len()
            )));
        }

        let width = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(PfaError::InvalidDataset(format!(
                    "row {} ('{}') has {} data points, expected {}",
                    i,
                    names[i],
                    row.len(),
                    width
                )));
            }
            if let Some(pos) = row.iter().position(|v| !v.is_finite()) {
                return Err(PfaError::InvalidDataset(format!(
                    "row {} ('{}') contains a non-finite value at data point {}",
                    i, names[i], pos
                )));
            }
        }

        Ok(Self { rows, names })
    }

    /// Number of rows (outputs + features)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of data points per row
    pub fn point_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Values of the row with the given global index
    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Name of the row with the given global index
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Copy of the dataset restricted to a random `frac` of the data points.
    ///
    /// Sampled points keep their original relative order. `frac >= 1.0`
    /// returns an unsampled copy without touching the generator.
    pub fn subsample<R: Rng + ?Sized>(&self, frac: f64, rng: &mut R) -> Dataset {
        let n = self.point_count();
        if frac >= 1.0 || n == 0 {
            return self.clone();
        }

        let amount = ((frac * n as f64).round() as usize).clamp(1, n);
        let mut picked = index::sample(rng, n, amount).into_vec();
        picked.sort_unstable();

        let rows = self
            .rows
            .iter()
            .map(|row| picked.iter().map(|&p| row[p]).collect())
            .collect();

        Dataset {
            rows,
            names: self.names.clone(),
        }
    }
}

/// Node visiting order for a sweep: outputs first, then features.
///
/// With `rng` set, the feature part is shuffled; output positions never move.
pub fn visiting_order<R: Rng + ?Sized>(
    row_count: usize,
    number_output_functions: usize,
    rng: Option<&mut R>,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..row_count).collect();
    if let Some(rng) = rng {
        let split = number_output_functions.min(row_count);
        order[split..].shuffle(rng);
    }
    order
}
