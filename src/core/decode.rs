use image::{DynamicImage, ImageDecoder, ImageReader, ImageResult, RgbImage};
use std::io::Cursor;

/// Decode a candidate blob into upright 8-bit RGB.
///
/// The format is sniffed from the bytes, the stored orientation (EXIF) is
/// applied so that the visual top-left becomes the pixel origin, and any
/// alpha channel or non-RGB color model is flattened away.
pub fn decode_normalized(bytes: &[u8]) -> ImageResult<RgbImage> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;

    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image.into_rgb8())
}

/// Hard resolution floor: thumbnails and icons never make it into the pool.
pub fn passes_resolution_gate(width: u32, height: u32, min_short_side: u32) -> bool {
    width.min(height) >= min_short_side
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    #[test]
    fn test_decode_flattens_alpha_to_rgb() {
        let rgba = ImageBuffer::from_fn(64, 48, |x, y| Rgba([x as u8, y as u8, 200, 128]));
        let bytes = encode(DynamicImage::ImageRgba8(rgba), ImageFormat::Png);

        let decoded = decode_normalized(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
        assert_eq!(decoded.get_pixel(10, 20).0, [10, 20, 200]);
    }

    #[test]
    fn test_decode_grayscale_expands_channels() {
        let gray = image::GrayImage::from_fn(32, 32, |x, _| image::Luma([x as u8 * 4]));
        let bytes = encode(DynamicImage::ImageLuma8(gray), ImageFormat::Png);

        let decoded = decode_normalized(&bytes).unwrap();
        assert_eq!(decoded.get_pixel(5, 0).0, [20, 20, 20]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_normalized(b"<html>definitely not a photo</html>").is_err());
        assert!(decode_normalized(&[]).is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_image() {
        let rgb = RgbImage::from_fn(128, 128, |x, y| image::Rgb([x as u8, y as u8, 0]));
        let bytes = encode(DynamicImage::ImageRgb8(rgb), ImageFormat::Png);

        assert!(decode_normalized(&bytes[..bytes.len() / 2]).is_err());
    }

    /// Big-endian TIFF block with a single Orientation entry.
    fn exif_orientation(value: u8) -> Vec<u8> {
        let mut exif = b"Exif\0\0".to_vec();
        exif.extend_from_slice(b"MM\0\x2a\0\0\0\x08");
        exif.extend_from_slice(&[0, 1]);
        exif.extend_from_slice(&[0x01, 0x12, 0, 3, 0, 0, 0, 1, 0, value, 0, 0]);
        exif.extend_from_slice(&[0, 0, 0, 0]);
        exif
    }

    #[test]
    fn test_decode_applies_exif_rotation() {
        let rgb = RgbImage::from_fn(64, 32, |x, _| image::Rgb([(x * 4) as u8, 0, 0]));
        let mut bytes = Vec::new();
        let mut encoder = jpeg_encoder::Encoder::new(&mut bytes, 90);
        encoder.add_app_segment(1, &exif_orientation(6)).unwrap();
        encoder
            .encode(rgb.as_raw(), 64, 32, jpeg_encoder::ColorType::Rgb)
            .unwrap();

        let decoded = decode_normalized(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (32, 64));
    }

    #[test]
    fn test_resolution_gate_uses_short_side() {
        assert!(passes_resolution_gate(400, 400, 400));
        assert!(passes_resolution_gate(1600, 400, 400));
        assert!(!passes_resolution_gate(1600, 399, 400));
        assert!(!passes_resolution_gate(300, 300, 400));
        assert!(passes_resolution_gate(300, 300, 0));
    }
}
