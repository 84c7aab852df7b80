//! Matching probe descriptors against stored profiles

use crate::error::ClusterError;
use crate::graph::cosine_distance;
use crate::recognition::ProfileStore;

/// Cosine-distance bound below which the nearest profile counts as a match
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.4;

/// Outcome of matching one probe against a store
#[derive(Debug, Clone, PartialEq)]
pub enum MatchDecision {
    /// The nearest profile was inside the threshold
    Match { name: String, distance: f64 },

    /// No profile was close enough; carries the runner-up when one exists
    NoMatch { nearest: Option<(String, f64)> },
}

/// Compare a probe descriptor against every profile's mean descriptor.
///
/// The decision is pure data; announcing unknown faces to a user is the
/// caller's business. Profiles with no usable mean are skipped.
pub fn match_descriptor(
    store: &ProfileStore,
    probe: &[f32],
    threshold: f64,
) -> Result<MatchDecision, ClusterError> {
    let norm_sq: f64 = probe.iter().map(|&x| x as f64 * x as f64).sum();
    if norm_sq == 0.0 {
        return Err(ClusterError::DegenerateProbe);
    }

    let mut nearest: Option<(String, f64)> = None;
    for profile in store.profiles() {
        let mean = match profile.mean_descriptor() {
            Some(mean) => mean,
            None => {
                log::warn!("Profile '{}' has no usable mean descriptor", profile.name);
                continue;
            }
        };
        let distance = match cosine_distance(probe, &mean) {
            Some(distance) => distance,
            None => {
                log::warn!("Profile '{}' has a degenerate mean descriptor", profile.name);
                continue;
            }
        };
        if nearest.as_ref().map_or(true, |(_, best)| distance < *best) {
            nearest = Some((profile.name.clone(), distance));
        }
    }

    match nearest {
        Some((name, distance)) if distance < threshold => {
            Ok(MatchDecision::Match { name, distance })
        }
        other => Ok(MatchDecision::NoMatch { nearest: other }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[(&str, Vec<f32>)]) -> ProfileStore {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::open(dir.path().join("profiles.bin")).unwrap();
        for (name, descriptor) in entries {
            store.add_descriptor(name, descriptor.clone());
        }
        store
    }

    #[test]
    fn test_nearest_profile_inside_threshold_matches() {
        let store = store_with(&[("alice", vec![1.0, 0.0]), ("bob", vec![0.0, 1.0])]);
        let decision = match_descriptor(&store, &[0.99, 0.01], 0.4).unwrap();
        match decision {
            MatchDecision::Match { name, distance } => {
                assert_eq!(name, "alice");
                assert!(distance < 0.01);
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_distant_probe_reports_runner_up() {
        let store = store_with(&[("alice", vec![1.0, 0.0])]);
        let decision = match_descriptor(&store, &[-1.0, 0.0], 0.4).unwrap();
        match decision {
            MatchDecision::NoMatch { nearest: Some((name, distance)) } => {
                assert_eq!(name, "alice");
                assert!(distance > 1.9);
            }
            other => panic!("expected a near-miss, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_store_is_a_clean_no_match() {
        let store = store_with(&[]);
        let decision = match_descriptor(&store, &[1.0, 0.0], 0.4).unwrap();
        assert_eq!(decision, MatchDecision::NoMatch { nearest: None });
    }

    #[test]
    fn test_zero_norm_probe_is_rejected() {
        let store = store_with(&[("alice", vec![1.0, 0.0])]);
        let err = match_descriptor(&store, &[0.0, 0.0], 0.4).unwrap_err();
        assert_eq!(err, ClusterError::DegenerateProbe);
    }

    #[test]
    fn test_boundary_distance_is_not_a_match() {
        // Orthogonal probe sits at distance exactly 1.0
        let store = store_with(&[("alice", vec![1.0, 0.0])]);
        let decision = match_descriptor(&store, &[0.0, 1.0], 1.0).unwrap();
        assert!(matches!(decision, MatchDecision::NoMatch { .. }));
    }
}
