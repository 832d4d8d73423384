//! Image I/O: decoding uploads and encoding outputs

use crate::constants::BACKGROUND_COLOR;
use crate::types::*;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Load and decode a photo from disk
pub async fn load_image(path: impl AsRef<Path>) -> Result<ImageSource> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let source = tokio::task::spawn_blocking(move || decode_image(&bytes)).await??;
    log::debug!(
        "Decoded {} ({}x{})",
        path.display(),
        source.width(),
        source.height()
    );
    Ok(source)
}

/// Decode any supported raster format into an RGB bitmap.
///
/// Transparent pixels are flattened onto the white canvas background.
pub fn decode_image(bytes: &[u8]) -> Result<ImageSource> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = if decoded.color().has_alpha() {
        flatten_alpha(&decoded)
    } else {
        decoded.to_rgb8()
    };
    Ok(ImageSource::new(rgb))
}

fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let [br, bg, bb] = BACKGROUND_COLOR;
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = a as u32;
        let blend = |c: u8, bgc: u8| ((c as u32 * a + bgc as u32 * (255 - a) + 127) / 255) as u8;
        Rgb([blend(r, br), blend(g, bg), blend(b, bb)])
    })
}

/// Encode a bitmap as JPEG with the given quality (1-100)
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    encoder.encode_image(image)?;
    Ok(bytes)
}

/// Write encoded output to `dir/filename`, returning the full path
pub async fn save_bytes(bytes: &[u8], dir: impl AsRef<Path>, filename: &str) -> Result<PathBuf> {
    let path = dir.as_ref().join(filename);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_reports_natural_size() {
        let bytes = png_bytes(DynamicImage::ImageRgb8(RgbImage::new(64, 32)));
        let source = decode_image(&bytes).unwrap();
        assert_eq!(source.width(), 64);
        assert_eq!(source.height(), 32);
    }

    #[test]
    fn test_transparent_pixels_become_white() {
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        let bytes = png_bytes(DynamicImage::ImageRgba8(rgba));
        let source = decode_image(&bytes).unwrap();
        assert_eq!(source.image.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            decode_image(b"not an image"),
            Err(PhotoError::Image(_))
        ));
    }

    #[test]
    fn test_jpeg_round_trip_dimensions() {
        let image = RgbImage::from_pixel(413, 531, Rgb([120, 80, 40]));
        let bytes = encode_jpeg(&image, 95).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 413);
        assert_eq!(decoded.height(), 531);
    }
}
