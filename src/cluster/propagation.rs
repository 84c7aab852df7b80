//! Label propagation over the weighted similarity graph

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use crate::config::ClusterConfig;
use crate::error::ClusterError;
use crate::graph::{AdjacencyMatrix, Node};

/// Controls for a propagation run
#[derive(Debug, Clone)]
pub struct PropagationOptions {
    /// Total number of single-node update iterations
    pub iterations: i64,

    /// RNG seed; None draws from OS entropy
    pub seed: Option<u64>,

    /// Break out once a full pass worth of draws changes no label
    pub stop_when_stable: bool,
}

impl PropagationOptions {
    /// Options with the given budget, entropy seeding, and no early stop
    pub fn new(iterations: i64) -> Self {
        Self {
            iterations,
            seed: None,
            stop_when_stable: false,
        }
    }

    /// Derive options from a configuration and the graph size
    pub fn from_config(config: &ClusterConfig, node_count: usize) -> Self {
        Self {
            iterations: config.total_iterations(node_count),
            seed: config.seed,
            stop_when_stable: config.stop_when_stable,
        }
    }

    /// Fix the RNG seed for a reproducible run
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable the early stability stop
    pub fn with_early_stop(mut self) -> Self {
        self.stop_when_stable = true;
        self
    }
}

/// What a propagation run did
#[derive(Debug, Clone, Default, Serialize)]
pub struct PropagationStats {
    /// Iterations actually executed, including draws of isolated nodes
    pub iterations_run: u64,

    /// Number of draws that rewrote a label
    pub label_updates: u64,

    /// Whether the run broke out on the stability check before the budget ran out
    pub stabilized_early: bool,
}

/// Run label propagation with an explicit budget and optional seed
pub fn run_whispers(
    nodes: &mut [Node],
    adjacency: &AdjacencyMatrix,
    iterations: i64,
    seed: Option<u64>,
) -> Result<PropagationStats, ClusterError> {
    let mut options = PropagationOptions::new(iterations);
    options.seed = seed;
    run_whispers_with(nodes, adjacency, &options)
}

/// Run label propagation.
///
/// Each iteration draws one node uniformly at random (with replacement) and
/// rewrites its label to the label of its neighbor across the heaviest edge.
/// Draws of isolated nodes are spent from the budget but change nothing.
pub fn run_whispers_with(
    nodes: &mut [Node],
    adjacency: &AdjacencyMatrix,
    options: &PropagationOptions,
) -> Result<PropagationStats, ClusterError> {
    if options.iterations < 0 {
        return Err(ClusterError::InvalidIterationBudget(options.iterations));
    }

    let n = nodes.len();
    let mut stats = PropagationStats::default();
    if n == 0 {
        log::debug!("Label propagation skipped: empty graph");
        return Ok(stats);
    }

    let mut rng = match options.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    };
    log::debug!(
        "Label propagation: budget {} over {} nodes (seed: {:?})",
        options.iterations,
        n,
        options.seed
    );

    // Iterations with no label change, in a row. Once every node's label
    // would survive a redraw, n unchanged draws is the stability signal.
    let mut unchanged_streak = 0_usize;

    for _ in 0..options.iterations {
        stats.iterations_run += 1;

        let idx = rng.gen_range(0..n);
        if nodes[idx].is_isolated() {
            unchanged_streak += 1;
            if options.stop_when_stable && unchanged_streak >= n {
                stats.stabilized_early = true;
                break;
            }
            continue;
        }

        // Adopt the label across the single heaviest edge. Strict comparison
        // over ascending neighbor ids makes ties resolve to the lowest id.
        let mut best_weight = 0.0_f64;
        let mut best_label = nodes[idx].label;
        for &neighbor in &nodes[idx].neighbors {
            assert!(
                (neighbor as usize) < n,
                "neighbor id {} out of range for graph of {} nodes",
                neighbor,
                n
            );
            let weight = adjacency.weight(idx, neighbor as usize);
            if weight > best_weight {
                best_weight = weight;
                best_label = nodes[neighbor as usize].label;
            }
        }

        if best_label != nodes[idx].label {
            nodes[idx].label = best_label;
            stats.label_updates += 1;
            unchanged_streak = 0;
        } else {
            unchanged_streak += 1;
            if options.stop_when_stable && unchanged_streak >= n {
                stats.stabilized_early = true;
                break;
            }
        }
    }

    log::debug!(
        "Label propagation done: {} iterations, {} label updates{}",
        stats.iterations_run,
        stats.label_updates,
        if stats.stabilized_early {
            " (stabilized early)"
        } else {
            ""
        }
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::FaceRecord;

    fn bare_node(id: u32) -> Node {
        Node::from_record(id, FaceRecord::new(vec![1.0, 0.0]))
    }

    fn wire(nodes: &mut [Node], adjacency: &mut AdjacencyMatrix, i: usize, j: usize, w: f64) {
        adjacency.set_pair(i, j, w);
        nodes[i].neighbors.push(j as u32);
        nodes[j].neighbors.push(i as u32);
        nodes[i].neighbors.sort_unstable();
        nodes[j].neighbors.sort_unstable();
    }

    #[test]
    fn test_negative_budget_is_rejected() {
        let mut nodes = vec![bare_node(0)];
        let adjacency = AdjacencyMatrix::zeros(1);
        let err = run_whispers(&mut nodes, &adjacency, -1, Some(7)).unwrap_err();
        assert_eq!(err, ClusterError::InvalidIterationBudget(-1));
    }

    #[test]
    fn test_empty_graph_is_a_no_op() {
        let mut nodes: Vec<Node> = Vec::new();
        let adjacency = AdjacencyMatrix::zeros(0);
        let stats = run_whispers(&mut nodes, &adjacency, 100, Some(7)).unwrap();
        assert_eq!(stats.iterations_run, 0);
        assert_eq!(stats.label_updates, 0);
    }

    #[test]
    fn test_zero_budget_leaves_labels_alone() {
        let mut nodes = vec![bare_node(0), bare_node(1)];
        let mut adjacency = AdjacencyMatrix::zeros(2);
        wire(&mut nodes, &mut adjacency, 0, 1, 5.0);
        let stats = run_whispers(&mut nodes, &adjacency, 0, Some(7)).unwrap();
        assert_eq!(stats.iterations_run, 0);
        assert_eq!(nodes[0].label, 0);
        assert_eq!(nodes[1].label, 1);
    }

    #[test]
    fn test_connected_pair_reaches_consensus() {
        let mut nodes = vec![bare_node(0), bare_node(1)];
        let mut adjacency = AdjacencyMatrix::zeros(2);
        wire(&mut nodes, &mut adjacency, 0, 1, 5.0);
        run_whispers(&mut nodes, &adjacency, 100, Some(42)).unwrap();
        assert_eq!(nodes[0].label, nodes[1].label);
    }

    #[test]
    fn test_triangle_reaches_consensus() {
        let mut nodes = vec![bare_node(0), bare_node(1), bare_node(2)];
        let mut adjacency = AdjacencyMatrix::zeros(3);
        wire(&mut nodes, &mut adjacency, 0, 1, 100.0);
        wire(&mut nodes, &mut adjacency, 0, 2, 1.0);
        wire(&mut nodes, &mut adjacency, 1, 2, 1.0);
        run_whispers(&mut nodes, &adjacency, 300, Some(42)).unwrap();
        assert_eq!(nodes[0].label, nodes[1].label);
        assert_eq!(nodes[1].label, nodes[2].label);
    }

    #[test]
    fn test_isolated_node_keeps_its_label() {
        let mut nodes = vec![bare_node(0)];
        let adjacency = AdjacencyMatrix::zeros(1);
        let stats = run_whispers(&mut nodes, &adjacency, 100, Some(42)).unwrap();
        assert_eq!(nodes[0].label, 0);
        assert_eq!(stats.label_updates, 0);
        assert_eq!(stats.iterations_run, 100);
    }

    #[test]
    fn test_same_seed_same_labels() {
        let build = || {
            let mut nodes = vec![bare_node(0), bare_node(1), bare_node(2), bare_node(3)];
            let mut adjacency = AdjacencyMatrix::zeros(4);
            wire(&mut nodes, &mut adjacency, 0, 1, 10.0);
            wire(&mut nodes, &mut adjacency, 1, 2, 3.0);
            wire(&mut nodes, &mut adjacency, 2, 3, 10.0);
            (nodes, adjacency)
        };

        let (mut first, adjacency) = build();
        run_whispers(&mut first, &adjacency, 200, Some(9)).unwrap();
        let (mut second, adjacency) = build();
        run_whispers(&mut second, &adjacency, 200, Some(9)).unwrap();

        let labels = |nodes: &[Node]| nodes.iter().map(|node| node.label).collect::<Vec<_>>();
        assert_eq!(labels(&first), labels(&second));
    }

    #[test]
    fn test_early_stop_spends_less_than_budget() {
        let mut nodes = vec![bare_node(0), bare_node(1)];
        let mut adjacency = AdjacencyMatrix::zeros(2);
        wire(&mut nodes, &mut adjacency, 0, 1, 5.0);
        let options = PropagationOptions::new(1_000_000)
            .with_seed(42)
            .with_early_stop();
        let stats = run_whispers_with(&mut nodes, &adjacency, &options).unwrap();
        assert!(stats.stabilized_early);
        assert!(stats.iterations_run < 1_000_000);
        assert_eq!(nodes[0].label, nodes[1].label);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_neighbor_panics() {
        let mut nodes = vec![bare_node(0)];
        nodes[0].neighbors.push(9);
        let adjacency = AdjacencyMatrix::zeros(1);
        let _ = run_whispers(&mut nodes, &adjacency, 10, Some(42));
    }
}
