//! Shared test utilities and fixture generators

#![allow(dead_code)]

use parpfa::pipeline::Dataset;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Data points of the 5^4 factorial design
pub const FACTORIAL_POINTS: usize = 625;

/// Minimum bin population that makes every digit level exactly one bin
pub const FACTORIAL_MIN_BIN: usize = 125;

/// Level (0..5) of factor `k` at data point `p` of the 5^4 full factorial
pub fn digit(p: usize, k: u32) -> f64 {
    ((p / 5usize.pow(k)) % 5) as f64
}

fn factorial_row(f: impl Fn(usize) -> f64) -> Vec<f64> {
    (0..FACTORIAL_POINTS).map(f).collect()
}

/// Two outputs and five candidate features over a full factorial design.
///
/// - row 0: output `y0` (factor 0)
/// - row 1: output `y1` (factor 1)
/// - row 2: `(f2 + f3) mod 5`, pairwise independent of every other row
/// - row 3: linear in `y0` plus noise from factor 2
/// - row 4: linear in `y0` plus noise from factor 3
/// - row 5: factor 2 (noise)
/// - row 6: factor 3 (noise)
///
/// Noise never crosses a bin boundary, so rows 3 and 4 bin exactly like
/// `y0`, and independent pairs give perfectly flat contingency tables.
pub fn factorial_dataset() -> Dataset {
    let rows = vec![
        factorial_row(|p| digit(p, 0)),
        factorial_row(|p| digit(p, 1)),
        factorial_row(|p| (digit(p, 2) + digit(p, 3)) % 5.0),
        factorial_row(|p| 2.0 * digit(p, 0) + 0.1 * digit(p, 2)),
        factorial_row(|p| -3.0 * digit(p, 0) + 0.1 * digit(p, 3)),
        factorial_row(|p| digit(p, 2)),
        factorial_row(|p| digit(p, 3)),
    ];
    let names = ["y0", "y1", "mix", "lin_a", "lin_b", "noise_a", "noise_b"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    Dataset::with_names(rows, names).unwrap()
}

/// Random dataset with one output: the first `related` features follow the
/// output with gaussian-ish noise, the rest are uniform noise.
pub fn random_dataset(seed: u64, points: usize, related: usize, unrelated: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let output: Vec<f64> = (0..points).map(|_| rng.gen::<f64>()).collect();

    let mut rows = vec![output.clone()];
    for i in 0..related {
        let scale = 0.1 * (i + 1) as f64;
        rows.push(
            output
                .iter()
                .map(|y| y + scale * (rng.gen::<f64>() - 0.5))
                .collect(),
        );
    }
    for _ in 0..unrelated {
        rows.push((0..points).map(|_| rng.gen::<f64>()).collect());
    }
    Dataset::new(rows).unwrap()
}

/// The factorial dataset as a DataFrame, one column per variable
pub fn factorial_dataframe() -> DataFrame {
    let dataset = factorial_dataset();
    let columns: Vec<Column> = dataset
        .names()
        .iter()
        .zip(dataset.rows())
        .map(|(name, row)| Column::new(name.as_str().into(), row.clone()))
        .collect();
    DataFrame::new(columns).unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}
