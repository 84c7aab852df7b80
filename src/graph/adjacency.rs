//! Dense symmetric adjacency matrix over edge weights

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Symmetric weight matrix for the face similarity graph.
///
/// Entry (i, j) is zero when the pair is not connected, otherwise the
/// inverse-square-distance edge weight. The diagonal is always zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjacencyMatrix {
    weights: Array2<f64>,
}

impl AdjacencyMatrix {
    /// Create an edgeless matrix for `node_count` nodes
    pub fn zeros(node_count: usize) -> Self {
        Self {
            weights: Array2::zeros((node_count, node_count)),
        }
    }

    /// Set the weight for an unordered pair, writing both triangles
    pub fn set_pair(&mut self, i: usize, j: usize, weight: f64) {
        self.weights[[i, j]] = weight;
        self.weights[[j, i]] = weight;
    }

    /// Weight of the edge between `i` and `j`; zero means no edge
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[[i, j]]
    }

    /// Number of nodes the matrix was sized for
    pub fn node_count(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        let n = self.node_count();
        let mut count = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                if self.weights[[i, j]] > 0.0 {
                    count += 1;
                }
            }
        }
        count
    }

    /// Ids of nodes adjacent to `i`, in ascending order
    pub fn neighbors_of(&self, i: usize) -> Vec<u32> {
        self.weights
            .row(i)
            .iter()
            .enumerate()
            .filter(|(j, &w)| *j != i && w > 0.0)
            .map(|(j, _)| j as u32)
            .collect()
    }

    /// True when every entry mirrors its transpose and the diagonal is zero
    pub fn is_symmetric(&self) -> bool {
        let n = self.node_count();
        for i in 0..n {
            if self.weights[[i, i]] != 0.0 {
                return false;
            }
            for j in (i + 1)..n {
                if self.weights[[i, j]] != self.weights[[j, i]] {
                    return false;
                }
            }
        }
        true
    }
}
