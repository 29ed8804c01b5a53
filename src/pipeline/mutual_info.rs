//! Mutual information between outputs and selected features
//!
//! MI is estimated from the joint distribution of binned rows, using the
//! same minimum-population binning as the independence tests.

use rayon::prelude::*;
use serde::Serialize;

use super::binning::{assign_bins, BinAssignment};
use super::config::validate_log_base;
use super::dataset::Dataset;
use super::error::{PfaError, PfaResult};
use super::independence::ContingencyTable;

/// Mutual information of one feature with one output
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MutualInformationScore {
    pub output_index: usize,
    pub feature_index: usize,
    pub mutual_information: f64,
}

/// Scores of one output: its self-information first, then every feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutualInformationTable {
    pub output_index: usize,
    pub entries: Vec<MutualInformationScore>,
}

impl MutualInformationTable {
    /// MI of the given feature with this table's output
    pub fn get(&self, feature_index: usize) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.feature_index == feature_index)
            .map(|e| e.mutual_information)
    }
}

/// Score `feature_indices` against every output row.
///
/// Each table starts with the output paired with itself (its entropy),
/// followed by the features in the given order. Degenerate rows score 0.
pub fn score_mutual_information(
    dataset: &Dataset,
    number_output_functions: usize,
    feature_indices: &[usize],
    min_n_datapoints_a_bin: usize,
    log_base: f64,
) -> PfaResult<Vec<MutualInformationTable>> {
    validate_log_base(log_base)?;
    if number_output_functions > dataset.row_count() {
        return Err(PfaError::configuration(
            "number_output_functions",
            format!(
                "{} outputs requested but the dataset has {} rows",
                number_output_functions,
                dataset.row_count()
            ),
        ));
    }
    if let Some(&bad) = feature_indices.iter().find(|&&i| i >= dataset.row_count()) {
        return Err(PfaError::configuration(
            "feature_indices",
            format!("index {} is out of range for {} rows", bad, dataset.row_count()),
        ));
    }

    let bin_row = |index: usize| assign_bins(dataset.row(index), min_n_datapoints_a_bin);
    let output_bins: Vec<Option<BinAssignment>> =
        (0..number_output_functions).into_par_iter().map(bin_row).collect();
    let feature_bins: Vec<Option<BinAssignment>> =
        feature_indices.par_iter().map(|&i| bin_row(i)).collect();

    let tables = output_bins
        .iter()
        .enumerate()
        .map(|(output_index, output)| {
            let self_entry = MutualInformationScore {
                output_index,
                feature_index: output_index,
                mutual_information: pair_information(output.as_ref(), output.as_ref(), log_base),
            };
            let entries = std::iter::once(self_entry)
                .chain(
                    feature_indices
                        .iter()
                        .zip(&feature_bins)
                        .filter(|(&feature_index, _)| feature_index != output_index)
                        .map(|(&feature_index, feature)| MutualInformationScore {
                            output_index,
                            feature_index,
                            mutual_information: pair_information(
                                output.as_ref(),
                                feature.as_ref(),
                                log_base,
                            ),
                        }),
                )
                .collect();
            MutualInformationTable {
                output_index,
                entries,
            }
        })
        .collect();

    Ok(tables)
}

fn pair_information(a: Option<&BinAssignment>, b: Option<&BinAssignment>, log_base: f64) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => ContingencyTable::from_assignments(a, b)
            .map(|table| mutual_information(&table, log_base))
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Mutual information of a contingency table in the given log base
pub fn mutual_information(table: &ContingencyTable, log_base: f64) -> f64 {
    let total = table.total();
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    let row_totals = table.row_totals();
    let col_totals = table.col_totals();

    let mut nats = 0.0;
    for (i, row) in table.counts().iter().enumerate() {
        for (j, &count) in row.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let joint = count as f64;
            nats += joint / n * (joint * n / (row_totals[i] as f64 * col_totals[j] as f64)).ln();
        }
    }

    (nats / log_base.ln()).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        // Output with 4 quantile bins; a copy; a cyclic independent row; a constant
        let output: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let copy: Vec<f64> = output.iter().map(|v| -2.0 * v).collect();
        let cyclic: Vec<f64> = (0..40).map(|i| (i % 4) as f64 + i as f64 * 1e-4).collect();
        let constant = vec![1.0; 40];
        Dataset::new(vec![output, copy, cyclic, constant]).unwrap()
    }

    #[test]
    fn test_self_information_is_entropy() {
        let tables = score_mutual_information(&dataset(), 1, &[], 10, 2.0).unwrap();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].entries.len(), 1);
        // Four equally likely bins: 2 bits
        assert!((tables[0].entries[0].mutual_information - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_copy_shares_full_information() {
        let tables = score_mutual_information(&dataset(), 1, &[1, 2, 3], 10, 2.0).unwrap();
        let table = &tables[0];

        let own = table.get(0).unwrap();
        let copy = table.get(1).unwrap();
        let cyclic = table.get(2).unwrap();

        assert!((copy - own).abs() < 1e-12);
        assert!(cyclic < 0.1, "cyclic row is nearly independent, got {}", cyclic);
        assert_eq!(table.get(3), Some(0.0), "constant row scores 0");
        assert!(table.entries.iter().all(|e| e.mutual_information >= 0.0));
    }

    #[test]
    fn test_natural_log_base() {
        let tables = score_mutual_information(&dataset(), 1, &[], 10, std::f64::consts::E).unwrap();
        let expected = 4f64.ln();
        assert!((tables[0].entries[0].mutual_information - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_log_base_rejected() {
        assert!(score_mutual_information(&dataset(), 1, &[1], 10, 1.0).is_err());
        assert!(score_mutual_information(&dataset(), 1, &[1], 10, -2.0).is_err());
    }

    #[test]
    fn test_out_of_range_feature_rejected() {
        let err = score_mutual_information(&dataset(), 1, &[9], 10, 2.0).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
