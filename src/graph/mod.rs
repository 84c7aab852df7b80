//! Similarity graph representation and construction module

pub mod adjacency;
pub mod builder;
pub mod node;

pub use adjacency::AdjacencyMatrix;
pub use builder::{build_graph, cosine_distance, GraphBuilder};
pub use node::{FaceRecord, Node};

/// The face similarity graph: one node per input descriptor plus the
/// symmetric weight matrix the edges live in
#[derive(Debug, Clone)]
pub struct FaceGraph {
    /// Nodes in input order; `nodes[i].id == i`
    pub nodes: Vec<Node>,

    /// Edge weights, indexed by node id
    pub adjacency: AdjacencyMatrix,
}

impl FaceGraph {
    /// Number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges in the graph
    pub fn edge_count(&self) -> usize {
        self.adjacency.edge_count()
    }
}
