//! parpfa: Principal Feature Analysis Library
//!
//! Finds the features of a dataset that carry information about its
//! outputs: rows are binned, tested pairwise for dependence with chi-square
//! tests, grouped into size-bounded clusters of the resulting dependency
//! graph, and the output-dependent members of each cluster are kept.
//! Repeated sweeps over sampled data are intersected into a consensus.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use pipeline::{
    principal_feature_analysis, Dataset, PfaConfig, PfaError, PfaReport, PfaResult,
    SilentObserver, SweepObserver,
};
