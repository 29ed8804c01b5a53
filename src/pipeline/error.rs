//! Error types for the principal feature analysis.
//!
//! Every failure the library can surface is a `PfaError`. Degenerate rows
//! (constant or too tie-heavy to bin) are not errors: they are treated as
//! independent of everything and never reach this type.

use thiserror::Error;

/// Errors that can occur while running a principal feature analysis.
#[derive(Debug, Error)]
pub enum PfaError {
    /// A configuration value is outside its valid range.
    #[error("Invalid configuration for '{parameter}': {message}")]
    Configuration {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Why the value was rejected
        message: String,
    },

    /// Not enough data points to form two bins of the minimum population.
    #[error(
        "Insufficient data: {available} data points available, at least {required} required \
         for two bins of {min_per_bin} points"
    )]
    InsufficientData {
        /// Data points present in the (sampled) dataset
        available: usize,
        /// Data points needed for a single 2x2 test
        required: usize,
        /// The configured minimum population per bin
        min_per_bin: usize,
    },

    /// The dataset itself is malformed (ragged rows, non-finite values).
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// A pairwise independence test could not be carried out.
    #[error("Independence test between rows {first} and {second} failed: {reason}")]
    PairwiseTest {
        first: usize,
        second: usize,
        reason: String,
    },

    /// A sweep failed; wraps the underlying error with the 1-based sweep number.
    #[error("Sweep {sweep} failed: {source}")]
    SweepFailed {
        sweep: usize,
        #[source]
        source: Box<PfaError>,
    },

    /// Every sweep failed while running in failure-tolerant mode.
    #[error("All {sweeps} sweep(s) failed; no consensus can be formed")]
    AllSweepsFailed { sweeps: usize },
}

impl PfaError {
    /// Shorthand for a configuration error.
    pub fn configuration(parameter: &'static str, message: impl Into<String>) -> Self {
        PfaError::Configuration {
            parameter,
            message: message.into(),
        }
    }

    /// Wrap this error with the sweep it happened in.
    pub fn in_sweep(self, sweep: usize) -> Self {
        PfaError::SweepFailed {
            sweep,
            source: Box::new(self),
        }
    }
}

/// Result alias used throughout the analysis pipeline.
pub type PfaResult<T> = std::result::Result<T, PfaError>;
