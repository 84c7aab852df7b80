//! Named profiles and their aggregate descriptors

use serde::{Deserialize, Serialize};

/// A known person: a name plus every descriptor enrolled for them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Display name, also the store key
    pub name: String,

    /// Enrolled descriptors, newest last
    pub descriptors: Vec<Vec<f32>>,
}

impl Profile {
    /// Create an empty profile
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptors: Vec::new(),
        }
    }

    /// Element-wise mean of the enrolled descriptors.
    ///
    /// Returns None for an empty profile or when enrolled descriptors
    /// disagree on length.
    pub fn mean_descriptor(&self) -> Option<Vec<f32>> {
        let first = self.descriptors.first()?;
        let dim = first.len();
        if self.descriptors.iter().any(|d| d.len() != dim) {
            return None;
        }

        let mut sums = vec![0.0_f64; dim];
        for descriptor in &self.descriptors {
            for (sum, &x) in sums.iter_mut().zip(descriptor) {
                *sum += x as f64;
            }
        }

        let count = self.descriptors.len() as f64;
        Some(sums.into_iter().map(|sum| (sum / count) as f32).collect())
    }
}
