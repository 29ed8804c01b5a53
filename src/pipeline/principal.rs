//! Principal feature selection within clusters

use serde::Serialize;

use super::cluster::Cluster;
use super::graph::DependencyGraph;

/// Principal features of one cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalFeatures {
    /// No feature in the cluster depends on any output
    None,
    /// Features depending on at least one output, in cluster order
    Features(Vec<usize>),
}

impl PrincipalFeatures {
    pub fn is_none(&self) -> bool {
        matches!(self, PrincipalFeatures::None)
    }

    /// The selected global indices (empty for `None`)
    pub fn indices(&self) -> &[usize] {
        match self {
            PrincipalFeatures::None => &[],
            PrincipalFeatures::Features(indices) => indices,
        }
    }
}

/// A feature judged dependent on the outputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrincipalFeatureRecord {
    /// Global index of the feature
    pub index: usize,
    /// Smallest p-value over the feature's output edges
    pub p_value: f64,
    /// Output with that smallest p-value (lowest index on ties)
    pub output: usize,
}

/// Select the principal features of `cluster`.
///
/// Every member with an edge below `alpha` to an output is principal; all
/// qualifying members are kept, equal p-values included.
pub fn select_principal_features(
    cluster: &Cluster,
    graph: &DependencyGraph,
    alpha: f64,
) -> (PrincipalFeatures, Vec<PrincipalFeatureRecord>) {
    let records: Vec<PrincipalFeatureRecord> = cluster
        .nodes()
        .iter()
        .filter_map(|&node| strongest_output_dependency(graph, node, alpha))
        .collect();

    if records.is_empty() {
        return (PrincipalFeatures::None, records);
    }

    let indices = records.iter().map(|r| r.index).collect();
    (PrincipalFeatures::Features(indices), records)
}

fn strongest_output_dependency(
    graph: &DependencyGraph,
    node: usize,
    alpha: f64,
) -> Option<PrincipalFeatureRecord> {
    graph
        .output_nodes()
        .filter_map(|output| graph.p_value(node, output).map(|p| (output, p)))
        .filter(|&(_, p)| p < alpha)
        .fold(None, |best: Option<(usize, f64)>, (output, p)| match best {
            Some((_, best_p)) if best_p <= p => best,
            _ => Some((output, p)),
        })
        .map(|(output, p_value)| PrincipalFeatureRecord {
            index: node,
            p_value,
            output,
        })
}
