//! Graph construction from face descriptors

use rayon::prelude::*;

use crate::config::ClusterConfig;
use crate::error::ClusterError;
use crate::graph::adjacency::AdjacencyMatrix;
use crate::graph::node::{FaceRecord, Node};
use crate::graph::FaceGraph;

/// Cosine distance between two descriptors: 1 - (u . v) / (|u| |v|).
///
/// Accumulates in f64 so long descriptors do not lose precision.
/// Returns None when the lengths differ or either vector has zero norm.
pub fn cosine_distance(u: &[f32], v: &[f32]) -> Option<f64> {
    if u.len() != v.len() {
        return None;
    }

    let mut dot = 0.0_f64;
    let mut norm_u = 0.0_f64;
    let mut norm_v = 0.0_f64;
    for (&a, &b) in u.iter().zip(v.iter()) {
        dot += a as f64 * b as f64;
        norm_u += a as f64 * a as f64;
        norm_v += b as f64 * b as f64;
    }

    if norm_u == 0.0 || norm_v == 0.0 {
        return None;
    }

    Some(1.0 - dot / (norm_u.sqrt() * norm_v.sqrt()))
}

/// Builds the similarity graph from validated descriptor records
pub struct GraphBuilder {
    /// Pairs closer than this cosine distance get an edge
    threshold: f64,

    /// Floor on pair distance before inverse-square weighting
    min_distance: f64,
}

impl GraphBuilder {
    /// Create a builder with an explicit threshold and the default distance floor
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            min_distance: ClusterConfig::default().min_distance,
        }
    }

    /// Create a builder from a full configuration
    pub fn from_config(config: &ClusterConfig) -> Self {
        Self {
            threshold: config.distance_threshold,
            min_distance: config.min_distance,
        }
    }

    /// Build the face graph.
    ///
    /// All descriptors are validated before any pair is compared, so the
    /// first bad record aborts the whole build with its index.
    pub fn build(&self, records: Vec<FaceRecord>) -> Result<FaceGraph, ClusterError> {
        let n = records.len();
        if n == 0 {
            return Ok(FaceGraph {
                nodes: Vec::new(),
                adjacency: AdjacencyMatrix::zeros(0),
            });
        }

        let expected = records[0].descriptor.len();
        let mut norms = Vec::with_capacity(n);
        for (index, record) in records.iter().enumerate() {
            let found = record.descriptor.len();
            if found != expected {
                return Err(ClusterError::DimensionMismatch {
                    index,
                    expected,
                    found,
                });
            }
            let norm_sq: f64 = record
                .descriptor
                .iter()
                .map(|&x| x as f64 * x as f64)
                .sum();
            if norm_sq == 0.0 {
                return Err(ClusterError::DegenerateVector { index });
            }
            norms.push(norm_sq.sqrt());
        }

        log::debug!("Comparing {} descriptor pairs", n * (n - 1) / 2);

        // Each row owns its upper-triangle pairs, so rows are independent
        // and the matrix fill below writes every unordered pair exactly once.
        let threshold = self.threshold;
        let min_distance = self.min_distance;
        let rows: Vec<Vec<(usize, f64)>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut row = Vec::new();
                for j in (i + 1)..n {
                    let mut dot = 0.0_f64;
                    for (&a, &b) in records[i].descriptor.iter().zip(&records[j].descriptor) {
                        dot += a as f64 * b as f64;
                    }
                    let distance = 1.0 - dot / (norms[i] * norms[j]);
                    if distance < threshold {
                        let clamped = distance.max(min_distance);
                        row.push((j, 1.0 / (clamped * clamped)));
                    }
                }
                row
            })
            .collect();

        let mut adjacency = AdjacencyMatrix::zeros(n);
        for (i, row) in rows.into_iter().enumerate() {
            for (j, weight) in row {
                adjacency.set_pair(i, j, weight);
            }
        }

        let mut nodes: Vec<Node> = records
            .into_iter()
            .enumerate()
            .map(|(id, record)| Node::from_record(id as u32, record))
            .collect();
        for node in nodes.iter_mut() {
            node.neighbors = adjacency.neighbors_of(node.id as usize);
        }

        Ok(FaceGraph { nodes, adjacency })
    }
}

/// Build a face graph with an explicit threshold and default clamping
pub fn build_graph(records: Vec<FaceRecord>, threshold: f64) -> Result<FaceGraph, ClusterError> {
    GraphBuilder::new(threshold).build(records)
}
