//! Node and input record types for the face graph

use serde::{Deserialize, Serialize};

/// One face descriptor as loaded from a manifest, before graph construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceRecord {
    /// Dense embedding produced by a face recognition model
    pub descriptor: Vec<f32>,

    /// Ground-truth identity, when the dataset is labeled
    #[serde(default)]
    pub truth: Option<String>,

    /// Source image path the face was cropped from
    #[serde(default)]
    pub file_path: Option<String>,
}

impl FaceRecord {
    /// Create a record carrying only a descriptor
    pub fn new(descriptor: Vec<f32>) -> Self {
        Self {
            descriptor,
            truth: None,
            file_path: None,
        }
    }
}

/// A face embedded in the similarity graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Index of this node in the graph, assigned in input order
    pub id: u32,

    /// Current cluster label; starts equal to `id` and is rewritten
    /// by label propagation
    pub label: u32,

    /// Ids of adjacent nodes, in ascending order
    pub neighbors: Vec<u32>,

    /// Descriptor this node was built from
    pub descriptor: Vec<f32>,

    /// Ground-truth identity carried through from the input record
    pub truth: Option<String>,

    /// Source image path carried through from the input record
    pub file_path: Option<String>,
}

impl Node {
    /// Create a node from an input record; the label starts as the node's own id
    pub fn from_record(id: u32, record: FaceRecord) -> Self {
        Self {
            id,
            label: id,
            neighbors: Vec::new(),
            descriptor: record.descriptor,
            truth: record.truth,
            file_path: record.file_path,
        }
    }

    /// True when the node has no edges and can never change label
    pub fn is_isolated(&self) -> bool {
        self.neighbors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_starts_as_own_id() {
        let node = Node::from_record(7, FaceRecord::new(vec![1.0, 0.0]));
        assert_eq!(node.id, 7);
        assert_eq!(node.label, 7);
        assert!(node.is_isolated());
    }

    #[test]
    fn test_record_metadata_carried_through() {
        let record = FaceRecord {
            descriptor: vec![0.5, 0.5],
            truth: Some("alice".to_string()),
            file_path: Some("faces/alice_01.jpg".to_string()),
        };
        let node = Node::from_record(0, record);
        assert_eq!(node.truth.as_deref(), Some("alice"));
        assert_eq!(node.file_path.as_deref(), Some("faces/alice_01.jpg"));
    }
}
