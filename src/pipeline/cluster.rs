//! Size-bounded partitioning of the feature dependency graph
//!
//! Clusters are connected components of the feature-feature subgraph.
//! Components larger than `cluster_size` are split by growing dense blocks:
//! start from the node with the most edges inside the component, then keep
//! adding the frontier node with the most edges into the block. Ties are
//! always broken by visiting order, never by hash order.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;

use super::error::{PfaError, PfaResult};
use super::graph::DependencyGraph;

/// A connected, size-bounded set of features (global indices)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cluster {
    nodes: Vec<usize>,
}

impl Cluster {
    pub fn new(nodes: Vec<usize>) -> Self {
        Self { nodes }
    }

    /// Members in visiting order
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: usize) -> bool {
        self.nodes.contains(&node)
    }
}

/// Partition the feature nodes of `graph` into clusters of at most
/// `cluster_size` connected nodes.
pub fn extract_clusters(graph: &DependencyGraph, cluster_size: usize) -> PfaResult<Vec<Cluster>> {
    if cluster_size < 1 {
        return Err(PfaError::configuration(
            "cluster_size",
            format!("must be at least 1, got {}", cluster_size),
        ));
    }

    let rank: HashMap<usize, usize> = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(position, &node)| (node, position))
        .collect();
    let features: Vec<usize> = graph.feature_nodes().collect();

    let mut clusters: Vec<Vec<usize>> = Vec::new();
    let mut pending: VecDeque<Vec<usize>> = components(graph, &features, &rank).into();

    while let Some(component) = pending.pop_front() {
        if component.len() <= cluster_size {
            clusters.push(component);
            continue;
        }

        let block = grow_block(graph, &component, cluster_size, &rank);
        let taken: HashSet<usize> = block.iter().copied().collect();
        let rest: Vec<usize> = component
            .into_iter()
            .filter(|n| !taken.contains(n))
            .collect();

        clusters.push(block);
        pending.extend(components(graph, &rest, &rank));
    }

    for cluster in &mut clusters {
        cluster.sort_by_key(|n| rank[n]);
    }
    clusters.sort_by_key(|c| rank[&c[0]]);

    Ok(clusters.into_iter().map(Cluster::new).collect())
}

/// Connected components of the subgraph induced by `nodes`, each in
/// breadth-first order, ordered by their first node.
fn components(
    graph: &DependencyGraph,
    nodes: &[usize],
    rank: &HashMap<usize, usize>,
) -> Vec<Vec<usize>> {
    let members: HashSet<usize> = nodes.iter().copied().collect();
    let mut seeds = nodes.to_vec();
    seeds.sort_by_key(|n| rank[n]);

    let mut visited: HashSet<usize> = HashSet::with_capacity(nodes.len());
    let mut result = Vec::new();

    for seed in seeds {
        if !visited.insert(seed) {
            continue;
        }
        let mut component = vec![seed];
        let mut queue = VecDeque::from([seed]);
        while let Some(node) = queue.pop_front() {
            let mut next: Vec<usize> = graph
                .feature_neighbours(node)
                .filter(|n| members.contains(n) && !visited.contains(n))
                .collect();
            next.sort_by_key(|n| rank[n]);
            for n in next {
                visited.insert(n);
                component.push(n);
                queue.push_back(n);
            }
        }
        result.push(component);
    }
    result
}

/// Grow a connected block of at most `size` nodes inside `component`
fn grow_block(
    graph: &DependencyGraph,
    component: &[usize],
    size: usize,
    rank: &HashMap<usize, usize>,
) -> Vec<usize> {
    let members: HashSet<usize> = component.iter().copied().collect();
    let inner_degree = |node: usize| {
        graph
            .feature_neighbours(node)
            .filter(|n| members.contains(n))
            .count()
    };

    let Some(seed) = component
        .iter()
        .copied()
        .max_by_key(|&n| (inner_degree(n), Reverse(rank[&n])))
    else {
        return Vec::new();
    };

    let mut block = vec![seed];
    let mut in_block: HashSet<usize> = HashSet::from([seed]);
    // Frontier node -> number of edges into the block
    let mut links: HashMap<usize, usize> = HashMap::new();

    let absorb = |node: usize, in_block: &HashSet<usize>, links: &mut HashMap<usize, usize>| {
        for n in graph.feature_neighbours(node) {
            if members.contains(&n) && !in_block.contains(&n) {
                *links.entry(n).or_insert(0) += 1;
            }
        }
    };
    absorb(seed, &in_block, &mut links);

    while block.len() < size {
        let Some(next) = links
            .iter()
            .max_by_key(|(&n, &count)| (count, Reverse(rank[&n])))
            .map(|(&n, _)| n)
        else {
            break;
        };
        links.remove(&next);
        in_block.insert(next);
        block.push(next);
        absorb(next, &in_block, &mut links);
    }

    block
}
