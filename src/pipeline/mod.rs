//! Pipeline module - binning, independence tests, graph, clusters and sweeps

pub mod binning;
pub mod cluster;
pub mod config;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod independence;
pub mod loader;
pub mod mutual_info;
pub mod principal;
pub mod sweep;

pub use binning::{assign_bins, BinAssignment};
pub use cluster::{extract_clusters, Cluster};
pub use config::PfaConfig;
pub use dataset::Dataset;
pub use error::{PfaError, PfaResult};
pub use graph::{build_dependency_graph, DependencyEdge, DependencyGraph};
pub use independence::{chi_square_test, IndependenceOutcome};
pub use loader::{dataset_from_frame, load_dataset, Layout};
pub use mutual_info::{score_mutual_information, MutualInformationScore, MutualInformationTable};
pub use principal::{select_principal_features, PrincipalFeatureRecord, PrincipalFeatures};
pub use sweep::{
    intersect_sweeps, principal_feature_analysis, run_sweep, FailedSweep, PfaReport,
    SilentObserver, SweepObserver, SweepRecord,
};
