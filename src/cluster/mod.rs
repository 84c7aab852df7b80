//! Cluster analysis module

pub mod extraction;
pub mod metrics;
pub mod propagation;

pub use extraction::extract_clusters;
pub use propagation::{run_whispers, run_whispers_with, PropagationOptions, PropagationStats};

use serde::{Deserialize, Serialize};

/// A group of faces that settled on the same label during propagation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// The shared label; the id of some node in the graph
    pub label: u32,

    /// Size of the cluster
    pub size: usize,

    /// Members of this cluster (node ids, ascending)
    pub members: Vec<u32>,

    /// Density: intra-cluster edges / potential edges
    pub density: f32,

    /// Member with the highest total intra-cluster edge weight
    pub exemplar: Option<u32>,

    /// Profile name attached by recognition, when a profile store matched
    pub identity: Option<String>,
}

impl Cluster {
    /// Create a cluster from its label and sorted member list
    pub fn new(label: u32, members: Vec<u32>) -> Self {
        Self {
            label,
            size: members.len(),
            members,
            density: 0.0,
            exemplar: None,
            identity: None,
        }
    }
}
