//! Dataset loader for CSV and Parquet files

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::dataset::Dataset;

/// How variables are laid out in the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Layout {
    /// One variable per column, named by the header row
    #[default]
    Columns,
    /// One variable per record, headerless (outputs first)
    Rows,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Columns => "columns",
            Layout::Rows => "rows",
        }
    }
}

/// Load a file (CSV or Parquet based on extension) into a DataFrame.
///
/// CSV files are read with a header row only in the column layout.
pub fn load_dataset(path: &Path, layout: Layout, infer_schema_length: usize) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => {
            let schema_length = (infer_schema_length > 0).then_some(infer_schema_length);
            LazyCsvReader::new(path)
                .with_has_header(layout == Layout::Columns)
                .with_infer_schema_length(schema_length)
                .finish()
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        }
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to read data from {}", path.display()))
}

/// Convert a loaded DataFrame into a `Dataset`.
///
/// Variables named in `output_columns` are moved to the front in the given
/// order; all others keep their file order. In the row layout variables
/// are named `row_0`, `row_1`, ...
pub fn dataset_from_frame(
    df: &DataFrame,
    layout: Layout,
    output_columns: &[String],
) -> Result<Dataset> {
    let mut names: Vec<String> = Vec::with_capacity(df.width());
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let name = column.name().to_string();
        columns.push(numeric_values(column, &name)?);
        names.push(name);
    }

    let (mut names, mut rows) = match layout {
        Layout::Columns => (names, columns),
        Layout::Rows => {
            let rows: Vec<Vec<f64>> = (0..df.height())
                .map(|r| columns.iter().map(|c| c[r]).collect())
                .collect();
            let names = (0..rows.len()).map(|i| format!("row_{}", i)).collect();
            (names, rows)
        }
    };

    if !output_columns.is_empty() {
        let mut front = Vec::with_capacity(output_columns.len());
        for output in output_columns {
            let position = names.iter().position(|n| n == output).with_context(|| {
                format!(
                    "Output column '{}' not found. Available variables: {:?}",
                    output, names
                )
            })?;
            front.push((names.remove(position), rows.remove(position)));
        }
        for (name, row) in front.into_iter().rev() {
            names.insert(0, name);
            rows.insert(0, row);
        }
    }

    Dataset::with_names(rows, names).context("Loaded data is not a valid dataset")
}

fn numeric_values(column: &Column, name: &str) -> Result<Vec<f64>> {
    let nulls = column.null_count();
    if nulls > 0 {
        bail!("Column '{}' contains {} null value(s)", name, nulls);
    }

    let float_col = column.cast(&DataType::Float64).map_err(|_| {
        anyhow::anyhow!("Column '{}' must be numeric (cannot cast to Float64)", name)
    })?;
    if float_col.null_count() > 0 {
        bail!(
            "Column '{}' contains {} non-numeric value(s)",
            name,
            float_col.null_count()
        );
    }

    let ca = float_col
        .f64()
        .map_err(|_| anyhow::anyhow!("Failed to access column '{}' as Float64", name))?;
    Ok(ca.into_no_null_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        df! {
            "a" => [1.0f64, 2.0, 3.0],
            "b" => [4i64, 5, 6],
            "target" => [7.0f64, 8.0, 9.0],
        }
        .unwrap()
    }

    #[test]
    fn test_columns_layout_keeps_names() {
        let ds = dataset_from_frame(&frame(), Layout::Columns, &[]).unwrap();
        assert_eq!(ds.names(), &["a", "b", "target"]);
        assert_eq!(ds.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_output_column_moved_to_front() {
        let ds = dataset_from_frame(&frame(), Layout::Columns, &["target".to_string()]).unwrap();
        assert_eq!(ds.names(), &["target", "a", "b"]);
        assert_eq!(ds.row(0), &[7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_rows_layout_transposes() {
        let ds = dataset_from_frame(&frame(), Layout::Rows, &[]).unwrap();
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.point_count(), 3);
        assert_eq!(ds.row(0), &[1.0, 4.0, 7.0]);
        assert_eq!(ds.name(2), "row_2");
    }

    #[test]
    fn test_missing_output_column_fails() {
        let err = dataset_from_frame(&frame(), Layout::Columns, &["nope".to_string()]).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_null_cells_fail() {
        let df = df! {
            "a" => [Some(1.0f64), None, Some(3.0)],
        }
        .unwrap();
        let err = dataset_from_frame(&df, Layout::Columns, &[]).unwrap_err();
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn test_text_cells_fail() {
        let df = df! {
            "a" => ["x", "y", "z"],
        }
        .unwrap();
        assert!(dataset_from_frame(&df, Layout::Columns, &[]).is_err());
    }
}
