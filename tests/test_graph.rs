//! Tests for binning, independence tests, graph construction and clustering

use parpfa::pipeline::{
    assign_bins, build_dependency_graph, chi_square_test, extract_clusters, Cluster,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

#[path = "common/mod.rs"]
mod common;

use common::{factorial_dataset, random_dataset, FACTORIAL_MIN_BIN};

#[test]
fn test_factorial_levels_bin_exactly() {
    let dataset = factorial_dataset();
    let bins = assign_bins(dataset.row(3), FACTORIAL_MIN_BIN).unwrap();

    assert_eq!(bins.bin_count(), 5);
    assert!(bins.counts().iter().all(|&c| c == FACTORIAL_MIN_BIN));
}

#[test]
fn test_chi_square_symmetry_on_random_rows() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..10 {
        let a: Vec<f64> = (0..300).map(|_| rng.gen::<f64>()).collect();
        let b: Vec<f64> = a.iter().map(|v| v + rng.gen::<f64>()).collect();
        let a = assign_bins(&a, 30).unwrap();
        let b = assign_bins(&b, 30).unwrap();

        let ab = chi_square_test(&a, &b, 0.01, 30).unwrap();
        let ba = chi_square_test(&b, &a, 0.01, 30).unwrap();
        assert_eq!(ab, ba);
    }
}

#[test]
fn test_factorial_graph_edges() {
    let graph = build_dependency_graph(&factorial_dataset(), 2, 0.01, FACTORIAL_MIN_BIN).unwrap();

    let edges: Vec<(usize, usize)> = graph.edges().iter().map(|e| (e.first, e.second)).collect();
    assert_eq!(edges, vec![(0, 3), (0, 4), (3, 4)]);
    assert!(graph.edges().iter().all(|e| e.p_value < 0.01));
}

#[test]
fn test_outputs_never_linked_to_each_other() {
    // Output rows 0 and 1 are strongly related, feature rows are not
    let dataset = random_dataset(12, 400, 1, 2);
    let graph = build_dependency_graph(&dataset, 2, 0.01, 40).unwrap();
    assert!(!graph.has_edge(0, 1));
}

#[test]
fn test_graph_is_deterministic() {
    let dataset = random_dataset(13, 400, 3, 3);
    let a = build_dependency_graph(&dataset, 1, 0.01, 40).unwrap();
    let b = build_dependency_graph(&dataset, 1, 0.01, 40).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_clusters_partition_features_within_bound() {
    let dataset = random_dataset(14, 500, 8, 4);
    let graph = build_dependency_graph(&dataset, 1, 0.01, 50).unwrap();

    for size in [1, 2, 3, 50] {
        let clusters = extract_clusters(&graph, size).unwrap();
        assert!(clusters.iter().all(|c| !c.is_empty() && c.len() <= size));

        let mut nodes: Vec<usize> = clusters.iter().flat_map(Cluster::nodes).copied().collect();
        nodes.sort_unstable();
        assert_eq!(nodes, (1..dataset.row_count()).collect::<Vec<_>>());
    }
}

#[test]
fn test_clustering_is_idempotent() {
    let dataset = random_dataset(15, 500, 8, 4);
    let graph = build_dependency_graph(&dataset, 1, 0.01, 50).unwrap();
    let clusters = extract_clusters(&graph, 3).unwrap();

    let owner: HashMap<usize, usize> = clusters
        .iter()
        .enumerate()
        .flat_map(|(c, cluster)| cluster.nodes().iter().map(move |&n| (n, c)))
        .collect();

    // Drop every feature edge that crosses a cluster boundary and re-cluster
    let restricted = graph.retain_edges(|a, b| match (owner.get(&a), owner.get(&b)) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    });
    assert_eq!(extract_clusters(&restricted, 3).unwrap(), clusters);
    assert_eq!(extract_clusters(&graph, 3).unwrap(), clusters);
}

#[test]
fn test_related_features_share_a_cluster() {
    let dataset = random_dataset(16, 600, 3, 3);
    let graph = build_dependency_graph(&dataset, 1, 0.01, 50).unwrap();
    let clusters = extract_clusters(&graph, 50).unwrap();

    let home = clusters.iter().find(|c| c.contains(1)).unwrap();
    assert!(home.contains(2));
    assert!(home.contains(3));
}
