//! Dependency graph construction from pairwise independence tests
//!
//! Nodes are global row indices (outputs and features). An undirected edge
//! joins two rows found dependent at `alpha` and carries the test's p-value.
//! Output rows are never tested against each other.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use super::binning::{assign_bins, BinAssignment};
use super::dataset::Dataset;
use super::error::{PfaError, PfaResult};
use super::independence::chi_square_test;

/// An undirected dependency edge between two global indices
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DependencyEdge {
    pub first: usize,
    pub second: usize,
    pub p_value: f64,
}

/// Undirected dependency graph over outputs and features
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyGraph {
    /// Node visiting order (global indices); outputs come first
    order: Vec<usize>,
    number_output_functions: usize,
    adjacency: BTreeMap<usize, BTreeMap<usize, f64>>,
}

impl DependencyGraph {
    /// Empty graph over the nodes of `order`
    pub fn new(order: Vec<usize>, number_output_functions: usize) -> Self {
        let adjacency = order.iter().map(|&node| (node, BTreeMap::new())).collect();
        Self {
            order,
            number_output_functions,
            adjacency,
        }
    }

    /// Add an undirected edge. Self-loops and unknown nodes are ignored.
    pub fn add_edge(&mut self, a: usize, b: usize, p_value: f64) {
        if a == b || !self.adjacency.contains_key(&a) || !self.adjacency.contains_key(&b) {
            return;
        }
        if let Some(neighbours) = self.adjacency.get_mut(&a) {
            neighbours.insert(b, p_value);
        }
        if let Some(neighbours) = self.adjacency.get_mut(&b) {
            neighbours.insert(a, p_value);
        }
    }

    /// Nodes in visiting order
    pub fn nodes(&self) -> &[usize] {
        &self.order
    }

    pub fn number_output_functions(&self) -> usize {
        self.number_output_functions
    }

    pub fn is_output(&self, node: usize) -> bool {
        node < self.number_output_functions
    }

    /// Output nodes in ascending global index
    pub fn output_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.keys().copied().filter(move |&n| self.is_output(n))
    }

    /// Feature nodes in visiting order
    pub fn feature_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied().filter(move |&n| !self.is_output(n))
    }

    /// p-value of the edge between `a` and `b`, if they are dependent
    pub fn p_value(&self, a: usize, b: usize) -> Option<f64> {
        self.adjacency.get(&a).and_then(|n| n.get(&b)).copied()
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.p_value(a, b).is_some()
    }

    /// Neighbours of `node` with edge p-values, in ascending global index
    pub fn neighbours(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flat_map(|n| n.iter().map(|(&k, &p)| (k, p)))
    }

    /// Feature neighbours of `node` (edges to outputs excluded)
    pub fn feature_neighbours(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbours(node)
            .map(|(n, _)| n)
            .filter(move |&n| !self.is_output(n))
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adjacency.get(&node).map(|n| n.len()).unwrap_or(0)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|n| n.len()).sum::<usize>() / 2
    }

    /// All edges, each once with `first < second`, in ascending order
    pub fn edges(&self) -> Vec<DependencyEdge> {
        self.adjacency
            .iter()
            .flat_map(|(&a, neighbours)| {
                neighbours
                    .iter()
                    .filter(move |(&b, _)| a < b)
                    .map(move |(&b, &p_value)| DependencyEdge {
                        first: a,
                        second: b,
                        p_value,
                    })
            })
            .collect()
    }

    /// Copy of the graph keeping only the edges accepted by `keep`
    pub fn retain_edges<F>(&self, mut keep: F) -> DependencyGraph
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut graph = DependencyGraph::new(self.order.clone(), self.number_output_functions);
        for edge in self.edges() {
            if keep(edge.first, edge.second) {
                graph.add_edge(edge.first, edge.second, edge.p_value);
            }
        }
        graph
    }
}

/// Build the dependency graph visiting rows in natural order
pub fn build_dependency_graph(
    dataset: &Dataset,
    number_output_functions: usize,
    alpha: f64,
    min_n_datapoints_a_bin: usize,
) -> PfaResult<DependencyGraph> {
    let order: Vec<usize> = (0..dataset.row_count()).collect();
    build_dependency_graph_ordered(
        dataset,
        number_output_functions,
        &order,
        alpha,
        min_n_datapoints_a_bin,
    )
}

/// Build the dependency graph with an explicit node visiting order.
///
/// Every row is binned once; every feature-feature and feature-output pair
/// is tested once, in parallel. Degenerate rows get no edges.
pub fn build_dependency_graph_ordered(
    dataset: &Dataset,
    number_output_functions: usize,
    order: &[usize],
    alpha: f64,
    min_n_datapoints_a_bin: usize,
) -> PfaResult<DependencyGraph> {
    let required = 2 * min_n_datapoints_a_bin;
    let available = dataset.point_count();
    if available < required {
        return Err(PfaError::InsufficientData {
            available,
            required,
            min_per_bin: min_n_datapoints_a_bin,
        });
    }

    // Bin every row once, in parallel
    let bins: Vec<Option<BinAssignment>> = dataset
        .rows()
        .par_iter()
        .map(|row| assign_bins(row, min_n_datapoints_a_bin))
        .collect();

    // Upper triangle by global index, skipping output-output pairs
    let n = dataset.row_count();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .filter(|&(_, j)| j >= number_output_functions)
        .collect();

    let edges: Vec<Option<DependencyEdge>> = pairs
        .par_iter()
        .map(|&(i, j)| -> PfaResult<Option<DependencyEdge>> {
            let (Some(a), Some(b)) = (&bins[i], &bins[j]) else {
                return Ok(None);
            };
            let outcome = chi_square_test(a, b, alpha, min_n_datapoints_a_bin).ok_or_else(|| {
                PfaError::PairwiseTest {
                    first: i,
                    second: j,
                    reason: format!("bin assignments cover {} and {} data points", a.len(), b.len()),
                }
            })?;
            Ok(outcome.dependent.then_some(DependencyEdge {
                first: i,
                second: j,
                p_value: outcome.p_value,
            }))
        })
        .collect::<PfaResult<Vec<_>>>()?;

    let mut graph = DependencyGraph::new(order.to_vec(), number_output_functions);
    for edge in edges.into_iter().flatten() {
        graph.add_edge(edge.first, edge.second, edge.p_value);
    }
    Ok(graph)
}
