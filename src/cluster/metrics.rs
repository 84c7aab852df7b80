//! Cluster statistics and metrics

use std::collections::HashMap;

use crate::cluster::Cluster;
use crate::graph::{AdjacencyMatrix, Node};

/// Fill in the derived metrics for a cluster
pub fn calculate_cluster_metrics(cluster: &mut Cluster, adjacency: &AdjacencyMatrix) {
    cluster.density = calculate_density(adjacency, &cluster.members);
    cluster.exemplar = find_exemplar(adjacency, &cluster.members);
}

/// Density: intra-cluster edges present / potential undirected pairs
pub fn calculate_density(adjacency: &AdjacencyMatrix, members: &[u32]) -> f32 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton clusters have density 1
    }

    let potential_edges = n * (n - 1) / 2;
    let mut actual_edges = 0;
    for (pos, &i) in members.iter().enumerate() {
        for &j in &members[pos + 1..] {
            if adjacency.weight(i as usize, j as usize) > 0.0 {
                actual_edges += 1;
            }
        }
    }

    actual_edges as f32 / potential_edges as f32
}

/// Member with the greatest total intra-cluster edge weight.
///
/// Ties go to the lowest node id. Singletons are their own exemplar.
pub fn find_exemplar(adjacency: &AdjacencyMatrix, members: &[u32]) -> Option<u32> {
    if members.is_empty() {
        return None;
    }

    let mut best = members[0];
    let mut best_weight = f64::NEG_INFINITY;
    for &i in members {
        let total: f64 = members
            .iter()
            .filter(|&&j| j != i)
            .map(|&j| adjacency.weight(i as usize, j as usize))
            .sum();
        if total > best_weight {
            best_weight = total;
            best = i;
        }
    }

    Some(best)
}

/// Fraction of truth-labeled nodes that agree with their cluster's majority
/// truth label. Returns None when no node carries a truth label.
///
/// Evaluation only; clustering itself never reads the truth field.
pub fn truth_purity(clusters: &[Cluster], nodes: &[Node]) -> Option<f64> {
    let mut labeled = 0_usize;
    let mut matched = 0_usize;

    for cluster in clusters {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for &member in &cluster.members {
            if let Some(truth) = nodes[member as usize].truth.as_deref() {
                *counts.entry(truth).or_insert(0) += 1;
            }
        }
        labeled += counts.values().sum::<usize>();
        matched += counts.values().max().copied().unwrap_or(0);
    }

    if labeled == 0 {
        None
    } else {
        Some(matched as f64 / labeled as f64)
    }
}
