//! Unit tests for dataset loader

use parpfa::pipeline::{dataset_from_frame, load_dataset, Layout};
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::{assert_shape, create_temp_csv, create_temp_parquet, factorial_dataframe};

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "y,a,b").unwrap();
    writeln!(file, "1,2,3").unwrap();
    writeln!(file, "4,5,6").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, Layout::Columns, 100).unwrap();
    assert_shape(&df, 2, 3);

    let dataset = dataset_from_frame(&df, Layout::Columns, &[]).unwrap();
    assert_eq!(dataset.names(), &["y", "a", "b"]);
    assert_eq!(dataset.row(2), &[3.0, 6.0]);
}

#[test]
fn test_load_headerless_rows_layout() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("rows.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "0.5,1.5,2.5,3.5").unwrap();
    writeln!(file, "1,2,3,4").unwrap();
    writeln!(file, "9,8,7,6").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, Layout::Rows, 100).unwrap();
    assert_shape(&df, 3, 4);

    let dataset = dataset_from_frame(&df, Layout::Rows, &[]).unwrap();
    assert_eq!(dataset.row_count(), 3);
    assert_eq!(dataset.point_count(), 4);
    assert_eq!(dataset.row(0), &[0.5, 1.5, 2.5, 3.5]);
    assert_eq!(dataset.row(2), &[9.0, 8.0, 7.0, 6.0]);
}

#[test]
fn test_csv_round_trip_preserves_values() {
    let mut df = factorial_dataframe();
    let (_dir, path) = create_temp_csv(&mut df);

    let loaded = load_dataset(&path, Layout::Columns, 10000).unwrap();
    let dataset = dataset_from_frame(&loaded, Layout::Columns, &[]).unwrap();
    let expected = common::factorial_dataset();

    assert_eq!(dataset.names(), expected.names());
    for i in 0..expected.row_count() {
        for (a, b) in dataset.row(i).iter().zip(expected.row(i)) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}

#[test]
fn test_parquet_with_named_outputs() {
    let mut df = factorial_dataframe();
    let (_dir, path) = create_temp_parquet(&mut df);

    let loaded = load_dataset(&path, Layout::Columns, 100).unwrap();
    let outputs = vec!["y1".to_string(), "noise_a".to_string()];
    let dataset = dataset_from_frame(&loaded, Layout::Columns, &outputs).unwrap();

    assert_eq!(
        dataset.names(),
        &["y1", "noise_a", "y0", "mix", "lin_a", "lin_b", "noise_b"]
    );
}

#[test]
fn test_unsupported_extension_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.xlsx");
    std::fs::write(&path, "irrelevant").unwrap();

    let err = load_dataset(&path, Layout::Columns, 100).unwrap_err();
    assert!(err.to_string().contains("Unsupported file format"));
}

#[test]
fn test_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.csv");
    assert!(load_dataset(&path, Layout::Columns, 100).is_err());
}

#[test]
fn test_empty_cells_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("gaps.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "y,a").unwrap();
    writeln!(file, "1,2").unwrap();
    writeln!(file, "3,").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, Layout::Columns, 100).unwrap();
    let err = dataset_from_frame(&df, Layout::Columns, &[]).unwrap_err();
    assert!(err.to_string().contains("null"));
}
