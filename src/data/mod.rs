//! Input handling: descriptor manifests, pixel buffers, provider boundary

pub mod image;
pub mod manifest;
pub mod provider;

pub use image::ImageData;
pub use manifest::{load_descriptors, parse_manifest, DescriptorManifest};
pub use provider::{collect_face_records, DescriptorProvider, Detection};
