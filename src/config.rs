//! Configuration management for the face cluster analyzer

/// Tuning knobs for graph construction and label propagation
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Cosine-distance cutoff below which two faces get an edge
    pub distance_threshold: f64,

    /// Propagation budget per node; total iterations default to this times N
    pub iterations_per_node: usize,

    /// Floor applied to pair distances before the 1/d^2 weighting, so
    /// near-duplicate images cannot produce unbounded edge weights
    pub min_distance: f64,

    /// Seed for the propagation RNG; None draws from OS entropy
    pub seed: Option<u64>,

    /// Stop early once a full pass worth of iterations changes no label
    pub stop_when_stable: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 0.5,
            iterations_per_node: 50,
            min_distance: 1e-6,
            seed: None,
            stop_when_stable: false,
        }
    }
}

impl ClusterConfig {
    /// Create a new configuration with custom values
    pub fn new(
        distance_threshold: f64,
        iterations_per_node: usize,
        min_distance: f64,
        seed: Option<u64>,
        stop_when_stable: bool,
    ) -> Self {
        Self {
            distance_threshold,
            iterations_per_node,
            min_distance,
            seed,
            stop_when_stable,
        }
    }

    /// Total propagation budget for a graph of `node_count` nodes
    pub fn total_iterations(&self, node_count: usize) -> i64 {
        (self.iterations_per_node * node_count) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClusterConfig::default();
        assert_eq!(config.distance_threshold, 0.5);
        assert_eq!(config.iterations_per_node, 50);
        assert!(config.seed.is_none());
        assert!(!config.stop_when_stable);
    }

    #[test]
    fn test_total_iterations_scales_with_node_count() {
        let config = ClusterConfig::default();
        assert_eq!(config.total_iterations(6), 300);
        assert_eq!(config.total_iterations(0), 0);
    }
}
