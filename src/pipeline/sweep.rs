//! Sweep orchestration and cross-sweep consensus
//!
//! A sweep samples the data points, builds the dependency graph in its own
//! visiting order, splits it into clusters and selects principal features.
//! Sweeps are independent trials; their principal features are intersected
//! once every sweep has finished.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use super::cluster::{extract_clusters, Cluster};
use super::config::PfaConfig;
use super::dataset::{visiting_order, Dataset};
use super::error::{PfaError, PfaResult};
use super::graph::build_dependency_graph_ordered;
use super::mutual_info::{score_mutual_information, MutualInformationTable};
use super::principal::{select_principal_features, PrincipalFeatureRecord, PrincipalFeatures};

/// Receives progress notifications from a running analysis.
///
/// With `parallel_sweeps` the methods are called from rayon workers, in
/// completion order.
pub trait SweepObserver: Sync {
    fn sweep_started(&self, _sweep: usize, _total: usize) {}
    fn sweep_finished(&self, _record: &SweepRecord) {}
    fn sweep_failed(&self, _sweep: usize, _error: &PfaError) {}
    fn mutual_information_started(&self, _features: usize) {}
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl SweepObserver for SilentObserver {}

/// Outcome of one sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRecord {
    /// 1-based sweep number
    pub sweep: usize,
    /// Every cluster of the sweep, in visiting order
    pub pf: Vec<Cluster>,
    /// Principal features of each cluster, aligned with `pf`
    pub pf_ds: Vec<PrincipalFeatures>,
    pub global_indices_and_principal_features_state_dependency: Vec<PrincipalFeatureRecord>,
    /// Data points used after sampling
    pub sample_size: usize,
    /// Dependent pairs found
    pub edge_count: usize,
}

impl SweepRecord {
    /// All principal features of the sweep, `None` entries skipped
    pub fn principal_features(&self) -> impl Iterator<Item = usize> + '_ {
        self.pf_ds.iter().flat_map(|pf| pf.indices().iter().copied())
    }
}

/// A sweep that failed in failure-tolerant mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedSweep {
    pub sweep: usize,
    pub error: String,
}

/// Result of a principal feature analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PfaReport {
    /// Consensus principal features, ascending global indices
    pub pf_from_intersection: Vec<usize>,
    pub sweep_history: Vec<SweepRecord>,
    pub failed_sweeps: Vec<FailedSweep>,
    pub list_data_frame_feature_mutual_information: Option<Vec<MutualInformationTable>>,
    /// Base seed the sweep generators were derived from
    pub seed: u64,
}

/// Run a complete principal feature analysis of `dataset`.
pub fn principal_feature_analysis(
    dataset: &Dataset,
    config: &PfaConfig,
    observer: &dyn SweepObserver,
) -> PfaResult<PfaReport> {
    config.validate()?;
    if config.number_output_functions >= dataset.row_count() {
        return Err(PfaError::configuration(
            "number_output_functions",
            format!(
                "{} outputs leave no features in a dataset of {} rows",
                config.number_output_functions,
                dataset.row_count()
            ),
        ));
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    let total = config.number_sweeps;

    let run = |sweep: usize| -> PfaResult<SweepRecord> {
        observer.sweep_started(sweep, total);
        let outcome = run_sweep(dataset, config, sweep, seed);
        match &outcome {
            Ok(record) => observer.sweep_finished(record),
            Err(error) => observer.sweep_failed(sweep, error),
        }
        outcome
    };

    let outcomes: Vec<PfaResult<SweepRecord>> = if config.parallel_sweeps {
        (1..=total).into_par_iter().map(run).collect()
    } else {
        let mut outcomes = Vec::with_capacity(total);
        for sweep in 1..=total {
            let outcome = run(sweep);
            let stop = outcome.is_err() && !config.tolerate_sweep_failures;
            outcomes.push(outcome);
            if stop {
                break;
            }
        }
        outcomes
    };

    let mut sweep_history = Vec::with_capacity(outcomes.len());
    let mut failed_sweeps = Vec::new();
    for (sweep, outcome) in (1..=total).zip(outcomes) {
        match outcome {
            Ok(record) => sweep_history.push(record),
            Err(error) if config.tolerate_sweep_failures => failed_sweeps.push(FailedSweep {
                sweep,
                error: error.to_string(),
            }),
            Err(error) => return Err(error.in_sweep(sweep)),
        }
    }
    if sweep_history.is_empty() {
        return Err(PfaError::AllSweepsFailed { sweeps: total });
    }

    let per_sweep: Vec<Vec<PrincipalFeatures>> =
        sweep_history.iter().map(|r| r.pf_ds.clone()).collect();
    let pf_from_intersection = intersect_sweeps(&per_sweep);

    let list_data_frame_feature_mutual_information = if config.calculate_mutual_information {
        observer.mutual_information_started(pf_from_intersection.len());
        Some(score_mutual_information(
            dataset,
            config.number_output_functions,
            &pf_from_intersection,
            config.min_n_datapoints_a_bin,
            config.basis_log_mutual_information,
        )?)
    } else {
        None
    };

    Ok(PfaReport {
        pf_from_intersection,
        sweep_history,
        failed_sweeps,
        list_data_frame_feature_mutual_information,
        seed,
    })
}

/// Run a single sweep (1-based `sweep`) with a generator seeded from
/// `base_seed + sweep`, so a sweep's sample and order never depend on how
/// many sweeps run or on which worker runs it.
pub fn run_sweep(
    dataset: &Dataset,
    config: &PfaConfig,
    sweep: usize,
    base_seed: u64,
) -> PfaResult<SweepRecord> {
    let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(sweep as u64));
    let sample = dataset.subsample(config.frac, &mut rng);
    let order = visiting_order(
        sample.row_count(),
        config.number_output_functions,
        config.shuffle_feature_numbers.then_some(&mut rng),
    );

    let graph = build_dependency_graph_ordered(
        &sample,
        config.number_output_functions,
        &order,
        config.alpha,
        config.min_n_datapoints_a_bin,
    )?;
    let pf = extract_clusters(&graph, config.cluster_size)?;

    let mut pf_ds = Vec::with_capacity(pf.len());
    let mut records = Vec::new();
    for cluster in &pf {
        let (principal, cluster_records) = select_principal_features(cluster, &graph, config.alpha);
        pf_ds.push(principal);
        records.extend(cluster_records);
    }

    Ok(SweepRecord {
        sweep,
        pf,
        pf_ds,
        global_indices_and_principal_features_state_dependency: records,
        sample_size: sample.point_count(),
        edge_count: graph.edge_count(),
    })
}

/// Intersect the principal features of every sweep.
///
/// Returns ascending global indices. A single sweep yields its own
/// principal features; no sweeps yield an empty set.
pub fn intersect_sweeps(sweeps: &[Vec<PrincipalFeatures>]) -> Vec<usize> {
    let as_set = |pf_ds: &Vec<PrincipalFeatures>| -> BTreeSet<usize> {
        pf_ds.iter().flat_map(|pf| pf.indices().iter().copied()).collect()
    };

    let mut iter = sweeps.iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };
    iter.fold(as_set(first), |acc, pf_ds| {
        let next = as_set(pf_ds);
        acc.intersection(&next).copied().collect()
    })
    .into_iter()
    .collect()
}
