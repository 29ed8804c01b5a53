//! Chi-square test of independence between two binned rows

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use super::binning::{merge_plan, BinAssignment};

/// Verdict of a single independence test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndependenceOutcome {
    /// True when the null hypothesis of independence is rejected at `alpha`
    pub dependent: bool,
    /// p-value of the chi-square test (1.0 for untestable tables)
    pub p_value: f64,
}

impl IndependenceOutcome {
    fn independent() -> Self {
        Self {
            dependent: false,
            p_value: 1.0,
        }
    }
}

/// Joint bin occupancy of two binned rows
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    counts: Vec<Vec<usize>>,
    total: usize,
}

impl ContingencyTable {
    /// Count joint occurrences of the bins of `rows` and `cols`.
    ///
    /// Returns None when the two assignments cover different numbers of points.
    pub fn from_assignments(rows: &BinAssignment, cols: &BinAssignment) -> Option<Self> {
        if rows.len() != cols.len() {
            return None;
        }
        let mut counts = vec![vec![0usize; cols.bin_count()]; rows.bin_count()];
        for (&r, &c) in rows.labels().iter().zip(cols.labels()) {
            counts[r][c] += 1;
        }
        Some(Self {
            counts,
            total: rows.len(),
        })
    }

    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<usize> {
        let width = self.counts.first().map(|r| r.len()).unwrap_or(0);
        (0..width)
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    pub fn shape(&self) -> (usize, usize) {
        (
            self.counts.len(),
            self.counts.first().map(|r| r.len()).unwrap_or(0),
        )
    }

    /// Merge adjacent rows and columns whose marginal total is below
    /// `min_per_bin`, using the same plan as row binning.
    pub fn coarsen(&self, min_per_bin: usize) -> Self {
        let row_plan = merge_plan(&self.row_totals(), min_per_bin);
        let col_plan = merge_plan(&self.col_totals(), min_per_bin);
        let n_rows = row_plan.iter().max().map(|m| m + 1).unwrap_or(0);
        let n_cols = col_plan.iter().max().map(|m| m + 1).unwrap_or(0);

        let mut counts = vec![vec![0usize; n_cols]; n_rows];
        for (i, row) in self.counts.iter().enumerate() {
            for (j, &count) in row.iter().enumerate() {
                counts[row_plan[i]][col_plan[j]] += count;
            }
        }
        Self {
            counts,
            total: self.total,
        }
    }

    /// Pearson chi-square statistic and its degrees of freedom
    pub fn chi_square(&self) -> (f64, usize) {
        let (r, c) = self.shape();
        if r < 2 || c < 2 || self.total == 0 {
            return (0.0, 0);
        }
        let row_totals = self.row_totals();
        let col_totals = self.col_totals();
        let n = self.total as f64;

        let mut statistic = 0.0;
        for (i, row) in self.counts.iter().enumerate() {
            for (j, &observed) in row.iter().enumerate() {
                let expected = row_totals[i] as f64 * col_totals[j] as f64 / n;
                if expected > 0.0 {
                    let diff = observed as f64 - expected;
                    statistic += diff * diff / expected;
                }
            }
        }
        (statistic, (r - 1) * (c - 1))
    }
}

/// Test two binned rows for independence.
///
/// Bins whose marginal population is below `min_per_bin` are merged first.
/// A table that collapses below 2x2 is reported independent. The operands
/// are put in a canonical order so `test(a, b)` and `test(b, a)` perform
/// identical arithmetic.
///
/// Returns None when the rows cover different numbers of data points.
pub fn chi_square_test(
    a: &BinAssignment,
    b: &BinAssignment,
    alpha: f64,
    min_per_bin: usize,
) -> Option<IndependenceOutcome> {
    let (rows, cols) = if b.labels() < a.labels() { (b, a) } else { (a, b) };
    let table = ContingencyTable::from_assignments(rows, cols)?.coarsen(min_per_bin);

    let (statistic, dof) = table.chi_square();
    if dof == 0 {
        return Some(IndependenceOutcome::independent());
    }

    let p_value = match ChiSquared::new(dof as f64) {
        Ok(dist) => dist.sf(statistic),
        Err(_) => return Some(IndependenceOutcome::independent()),
    };
    if !p_value.is_finite() {
        return Some(IndependenceOutcome::independent());
    }
    let p_value = p_value.clamp(0.0, 1.0);

    Some(IndependenceOutcome {
        dependent: p_value < alpha,
        p_value,
    })
}
