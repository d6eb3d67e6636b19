use image::RgbImage;
use jpeg_encoder::{ColorType, Encoder, EncodingError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("{width}x{height} exceeds the JPEG size limit")]
    TooLarge { width: u32, height: u32 },

    #[error("JPEG encoding failed: {0}")]
    Jpeg(#[from] EncodingError),
}

/// Encode as a progressive JPEG with optimized Huffman tables.
pub fn encode_progressive_jpeg(pixels: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = pixels.dimensions();
    let too_large = || EncodeError::TooLarge { width, height };
    let w = u16::try_from(width).map_err(|_| too_large())?;
    let h = u16::try_from(height).map_err(|_| too_large())?;

    let mut bytes = Vec::new();
    let mut encoder = Encoder::new(&mut bytes, quality);
    encoder.set_progressive(true);
    encoder.set_optimized_huffman_tables(true);
    encoder.encode(pixels.as_raw(), w, h, ColorType::Rgb)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fingerprint::testing::block_pattern;

    fn has_marker(bytes: &[u8], marker: u8) -> bool {
        bytes.windows(2).any(|w| w == [0xFF, marker])
    }

    #[test]
    fn test_roundtrip_keeps_dimensions() {
        let pixels = block_pattern(640, 427, 5);
        let bytes = encode_progressive_jpeg(&pixels, 88).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 427));
    }

    #[test]
    fn test_output_is_progressive_jpeg() {
        let bytes = encode_progressive_jpeg(&block_pattern(64, 64, 1), 88).unwrap();

        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            image::ImageFormat::Jpeg
        );
        // SOF2 marks a progressive frame.
        assert!(has_marker(&bytes, 0xC2));
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let pixels = block_pattern(256, 256, 9);
        let high = encode_progressive_jpeg(&pixels, 95).unwrap();
        let low = encode_progressive_jpeg(&pixels, 30).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let pixels = block_pattern(200, 150, 2);
        assert_eq!(
            encode_progressive_jpeg(&pixels, 88).unwrap(),
            encode_progressive_jpeg(&pixels, 88).unwrap()
        );
    }
}
