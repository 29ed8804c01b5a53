//! Analysis configuration with validated, named fields

use serde::Serialize;

use super::error::{PfaError, PfaResult};

/// Configuration for a principal feature analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PfaConfig {
    /// Number of leading rows that hold output (target) components
    pub number_output_functions: usize,
    /// Number of independent sweeps whose results are intersected
    pub number_sweeps: usize,
    /// Maximum number of nodes per cluster
    pub cluster_size: usize,
    /// Significance level of the chi-square tests
    pub alpha: f64,
    /// Minimum number of data points in every bin
    pub min_n_datapoints_a_bin: usize,
    /// Visit features in a random order in every sweep
    pub shuffle_feature_numbers: bool,
    /// Fraction of data points sampled in every sweep
    pub frac: f64,
    /// Score the consensus features with mutual information
    pub calculate_mutual_information: bool,
    /// Logarithm base for mutual information (2 = bits, e = nats)
    pub basis_log_mutual_information: f64,
    /// Seed for sampling and shuffling; random when not set
    pub seed: Option<u64>,
    /// Run sweeps on the rayon thread pool
    pub parallel_sweeps: bool,
    /// Record failed sweeps and continue instead of failing fast
    pub tolerate_sweep_failures: bool,
}

impl Default for PfaConfig {
    fn default() -> Self {
        Self {
            number_output_functions: 1,
            number_sweeps: 1,
            cluster_size: 50,
            alpha: 0.01,
            min_n_datapoints_a_bin: 500,
            shuffle_feature_numbers: false,
            frac: 1.0,
            calculate_mutual_information: false,
            basis_log_mutual_information: 2.0,
            seed: None,
            parallel_sweeps: false,
            tolerate_sweep_failures: false,
        }
    }
}

impl PfaConfig {
    /// Check every parameter range. Dataset-dependent checks (such as
    /// `number_output_functions` against the row count) happen when the
    /// analysis starts.
    pub fn validate(&self) -> PfaResult<()> {
        if self.number_output_functions < 1 {
            return Err(PfaError::configuration(
                "number_output_functions",
                "at least one output row is required",
            ));
        }
        if self.number_sweeps < 1 {
            return Err(PfaError::configuration(
                "number_sweeps",
                format!("must be at least 1, got {}", self.number_sweeps),
            ));
        }
        if self.cluster_size < 1 {
            return Err(PfaError::configuration(
                "cluster_size",
                format!("must be at least 1, got {}", self.cluster_size),
            ));
        }
        validate_alpha(self.alpha)?;
        if self.min_n_datapoints_a_bin < 1 {
            return Err(PfaError::configuration(
                "min_n_datapoints_a_bin",
                "must be at least 1",
            ));
        }
        if !(self.frac > 0.0 && self.frac <= 1.0) {
            return Err(PfaError::configuration(
                "frac",
                format!("must be in (0, 1], got {}", self.frac),
            ));
        }
        validate_log_base(self.basis_log_mutual_information)?;
        Ok(())
    }

    /// Whether sweeps need a random number generator at all
    pub fn uses_randomness(&self) -> bool {
        self.shuffle_feature_numbers || self.frac < 1.0
    }
}

pub(crate) fn validate_alpha(alpha: f64) -> PfaResult<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(PfaError::configuration(
            "alpha",
            format!("must be in (0, 1), got {}", alpha),
        ))
    }
}

pub(crate) fn validate_log_base(base: f64) -> PfaResult<()> {
    if base.is_finite() && base > 0.0 && base != 1.0 {
        Ok(())
    } else {
        Err(PfaError::configuration(
            "basis_log_mutual_information",
            format!("must be positive, finite and not 1, got {}", base),
        ))
    }
}
