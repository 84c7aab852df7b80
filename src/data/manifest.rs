//! Descriptor manifest loading

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::graph::FaceRecord;

/// On-disk manifest produced by an external embedding pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorManifest {
    /// One record per detected face
    pub faces: Vec<FaceRecord>,
}

/// Parse a manifest from its JSON text
pub fn parse_manifest(text: &str) -> Result<DescriptorManifest> {
    let manifest = serde_json::from_str(text)?;
    Ok(manifest)
}

/// Load face records from a JSON manifest file
pub fn load_descriptors(path: &str) -> Result<Vec<FaceRecord>> {
    log::info!("Reading descriptor manifest: {}", path);

    if !std::path::Path::new(path).exists() {
        return Err(anyhow::anyhow!("File not found: {}", path));
    }

    let text = std::fs::read_to_string(path)?;
    let manifest = parse_manifest(&text)?;

    let with_truth = manifest
        .faces
        .iter()
        .filter(|face| face.truth.is_some())
        .count();
    log::info!(
        "Loaded {} face descriptors ({} with ground-truth labels)",
        manifest.faces.len(),
        with_truth
    );

    Ok(manifest.faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let text = r#"{
            "faces": [
                {
                    "descriptor": [0.1, 0.2, 0.3],
                    "truth": "alice",
                    "file_path": "faces/alice_01.jpg"
                }
            ]
        }"#;
        let manifest = parse_manifest(text).unwrap();
        assert_eq!(manifest.faces.len(), 1);
        assert_eq!(manifest.faces[0].descriptor, vec![0.1, 0.2, 0.3]);
        assert_eq!(manifest.faces[0].truth.as_deref(), Some("alice"));
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let text = r#"{"faces": [{"descriptor": [1.0, 0.0]}]}"#;
        let manifest = parse_manifest(text).unwrap();
        assert!(manifest.faces[0].truth.is_none());
        assert!(manifest.faces[0].file_path.is_none());
    }

    #[test]
    fn test_malformed_manifest_is_an_error() {
        assert!(parse_manifest("{\"faces\": [{}]}").is_err());
        assert!(parse_manifest("not json").is_err());
    }
}
