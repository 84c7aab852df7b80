//! Owned pixel buffers handed to descriptor providers

/// A decoded image: contiguous RGB bytes in row-major order.
///
/// Decoding happens outside the crate; providers only ever see
/// three-channel data.
#[derive(Debug, Clone)]
pub struct ImageData {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImageData {
    /// Wrap an RGB byte buffer
    pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "pixel length must equal width * height * 3"
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Build an RGB image from RGBA bytes by dropping the alpha channel
    pub fn from_rgba(rgba: &[u8], width: u32, height: u32) -> Self {
        debug_assert_eq!(
            rgba.len(),
            (width as usize) * (height as usize) * 4,
            "pixel length must equal width * height * 4"
        );
        let pixels = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let image = ImageData::new(vec![0u8; 12], 2, 2);
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        assert_eq!(image.pixels().len(), 12);
    }

    #[test]
    fn test_from_rgba_strips_alpha() {
        // Two pixels: red and green, both fully opaque
        let rgba = vec![255, 0, 0, 255, 0, 255, 0, 255];
        let image = ImageData::from_rgba(&rgba, 2, 1);
        assert_eq!(image.pixels(), &[255, 0, 0, 0, 255, 0]);
    }

    #[test]
    #[should_panic(expected = "pixel length must equal width * height * 3")]
    fn test_mismatched_length_panics_in_debug() {
        ImageData::new(vec![0u8; 10], 2, 2);
    }
}
