//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::pipeline::{Layout, PfaConfig};

/// parpfa - Find the principal features of a dataset through dependency graphs
#[derive(Parser, Debug)]
#[command(name = "parpfa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// How variables are laid out in the input file.
    /// "columns": one variable per column with a header row (default).
    /// "rows": one variable per record, headerless, outputs first.
    #[arg(long, value_enum, default_value_t = Layout::Columns)]
    pub layout: Layout,

    /// Output variables by name (comma-separated). They are moved to the
    /// front and their count overrides --output-functions.
    #[arg(long, value_delimiter = ',')]
    pub output_columns: Vec<String>,

    /// Number of leading variables that are outputs
    #[arg(short = 'n', long, default_value = "1", value_parser = validate_at_least_one)]
    pub output_functions: usize,

    /// Number of sweeps whose principal features are intersected
    #[arg(short, long, default_value = "1", value_parser = validate_at_least_one)]
    pub sweeps: usize,

    /// Maximum number of features per cluster
    #[arg(short, long, default_value = "50", value_parser = validate_at_least_one)]
    pub cluster_size: usize,

    /// Significance level of the chi-square independence tests
    #[arg(short, long, default_value = "0.01", value_parser = validate_alpha)]
    pub alpha: f64,

    /// Minimum number of data points in every bin
    #[arg(long, default_value = "500", value_parser = validate_at_least_one)]
    pub min_bin_size: usize,

    /// Visit features in a random order in every sweep
    #[arg(long, default_value = "false")]
    pub shuffle: bool,

    /// Fraction of data points sampled in every sweep, in (0, 1]
    #[arg(long, default_value = "1.0", value_parser = validate_frac)]
    pub frac: f64,

    /// Score the principal features with mutual information
    #[arg(long, default_value = "false")]
    pub mutual_information: bool,

    /// Logarithm base for mutual information (2 = bits)
    #[arg(long, default_value = "2.0", value_parser = validate_log_base)]
    pub log_base: f64,

    /// Seed for sampling and shuffling (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run sweeps in parallel
    #[arg(long, default_value = "false")]
    pub parallel_sweeps: bool,

    /// Record failed sweeps and continue instead of aborting
    #[arg(long, default_value = "false")]
    pub tolerate_failures: bool,

    /// JSON report path.
    /// Defaults to input directory with '_pfa.json' suffix (e.g., data.csv → data_pfa.json).
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Suppress progress output
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Get the report path, deriving it from the input if not explicitly provided.
    pub fn report_path(&self) -> PathBuf {
        self.report
            .clone()
            .unwrap_or_else(|| derive_report_path(&self.input))
    }

    /// Number of outputs: the named output columns when given, otherwise
    /// --output-functions
    pub fn number_output_functions(&self) -> usize {
        if self.output_columns.is_empty() {
            self.output_functions
        } else {
            self.output_columns.len()
        }
    }

    /// Build the analysis configuration from the parsed flags
    pub fn config(&self) -> PfaConfig {
        PfaConfig {
            number_output_functions: self.number_output_functions(),
            number_sweeps: self.sweeps,
            cluster_size: self.cluster_size,
            alpha: self.alpha,
            min_n_datapoints_a_bin: self.min_bin_size,
            shuffle_feature_numbers: self.shuffle,
            frac: self.frac,
            calculate_mutual_information: self.mutual_information,
            basis_log_mutual_information: self.log_base,
            seed: self.seed,
            parallel_sweeps: self.parallel_sweeps,
            tolerate_sweep_failures: self.tolerate_failures,
        }
    }
}

fn derive_report_path(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    parent.join(format!("{}_pfa.json", stem))
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not a valid number", s))
}

/// Validator for counts that must be at least 1
fn validate_at_least_one(s: &str) -> Result<usize, String> {
    let value: usize = parse_number(s)?;
    if value < 1 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for alpha parameter
fn validate_alpha(s: &str) -> Result<f64, String> {
    let value: f64 = parse_number(s)?;
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!("alpha must be strictly between 0.0 and 1.0, got {}", value))
    }
}

/// Validator for frac parameter
fn validate_frac(s: &str) -> Result<f64, String> {
    let value: f64 = parse_number(s)?;
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(format!("frac must be in (0.0, 1.0], got {}", value))
    }
}

/// Validator for log_base parameter
fn validate_log_base(s: &str) -> Result<f64, String> {
    let value: f64 = parse_number(s)?;
    if value.is_finite() && value > 0.0 && value != 1.0 {
        Ok(value)
    } else {
        Err(format!("log base must be positive, finite and not 1, got {}", value))
    }
}
