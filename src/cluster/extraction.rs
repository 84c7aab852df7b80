//! Cluster extraction from propagated labels

use itertools::Itertools;

use crate::cluster::Cluster;
use crate::graph::Node;

/// Group nodes into clusters by their final label.
///
/// Membership is decided by label equality alone. Propagation can carry a
/// label across bridge nodes, so a cluster is not necessarily a connected
/// subgraph and connectivity is deliberately not consulted here.
pub fn extract_clusters(nodes: &[Node]) -> Vec<Cluster> {
    let groups = nodes
        .iter()
        .map(|node| (node.label, node.id))
        .into_group_map();

    groups
        .into_iter()
        .sorted_by_key(|(label, _)| *label)
        .map(|(label, mut members)| {
            members.sort_unstable();
            Cluster::new(label, members)
        })
        .collect()
}
