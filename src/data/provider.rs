//! Boundary to the external face detection and embedding model

use anyhow::Result;

use crate::data::ImageData;
use crate::graph::FaceRecord;

/// One detected face within an image
#[derive(Debug, Clone)]
pub struct Detection {
    /// Face bounding box as [x1, y1, x2, y2] in pixel coordinates
    pub bounds: [f64; 4],

    /// Detector confidence; filtering policy belongs to the caller
    pub probability: f64,

    /// Facial landmark points used for alignment
    pub landmarks: Vec<(f64, f64)>,
}

/// Source of face detections and descriptor vectors.
///
/// No model ships in this crate; callers plug in whatever embedding
/// pipeline they run, and the clustering core only ever sees the
/// resulting fixed-length vectors.
pub trait DescriptorProvider {
    /// Find faces in an image
    fn detect(&self, image: &ImageData) -> Result<Vec<Detection>>;

    /// Compute one descriptor per detection
    fn compute_descriptors(
        &self,
        image: &ImageData,
        detections: &[Detection],
    ) -> Result<Vec<Vec<f32>>>;
}

/// Run a provider over a set of images and collect one record per face found
pub fn collect_face_records<P: DescriptorProvider>(
    provider: &P,
    images: &[(ImageData, String)],
) -> Result<Vec<FaceRecord>> {
    let mut records = Vec::new();
    for (image, path) in images {
        let detections = provider.detect(image)?;
        log::debug!("{}: {} face(s) detected", path, detections.len());
        let descriptors = provider.compute_descriptors(image, &detections)?;
        for descriptor in descriptors {
            records.push(FaceRecord {
                descriptor,
                truth: None,
                file_path: Some(path.clone()),
            });
        }
    }
    log::info!(
        "Collected {} face records from {} images",
        records.len(),
        images.len()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Claims every image holds exactly one centered face
    struct FixedProvider {
        descriptor: Vec<f32>,
    }

    impl DescriptorProvider for FixedProvider {
        fn detect(&self, image: &ImageData) -> Result<Vec<Detection>> {
            Ok(vec![Detection {
                bounds: [0.0, 0.0, image.width() as f64, image.height() as f64],
                probability: 1.0,
                landmarks: Vec::new(),
            }])
        }

        fn compute_descriptors(
            &self,
            _image: &ImageData,
            detections: &[Detection],
        ) -> Result<Vec<Vec<f32>>> {
            Ok(detections.iter().map(|_| self.descriptor.clone()).collect())
        }
    }

    #[test]
    fn test_collect_records_carries_file_paths() {
        let provider = FixedProvider {
            descriptor: vec![1.0, 0.0],
        };
        let images = vec![
            (ImageData::new(vec![0u8; 12], 2, 2), "a.jpg".to_string()),
            (ImageData::new(vec![0u8; 12], 2, 2), "b.jpg".to_string()),
        ];
        let records = collect_face_records(&provider, &images).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].file_path.as_deref(), Some("a.jpg"));
        assert_eq!(records[1].file_path.as_deref(), Some("b.jpg"));
        assert_eq!(records[0].descriptor, vec![1.0, 0.0]);
    }
}
