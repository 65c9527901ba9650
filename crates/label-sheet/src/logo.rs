//! Logo ingestion
//!
//! The logo is snapshotted as bytes at the start of a render and never
//! re-read mid-pass. An unreadable or undecodable image is a resource
//! problem, not a render failure: it is logged and the logo step is
//! skipped.

use image::Rgba;
use printpdf::RawImage;
use std::io::Cursor;
use std::path::Path;

/// Read the logo file, or None (with a warning) when it is unreadable
pub fn snapshot_logo(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("logo '{}' unreadable, skipping: {}", path.display(), e);
            None
        }
    }
}

/// Decode logo bytes into an embeddable image.
///
/// Transparency is flattened onto white first: PDF viewers disagree on
/// soft-mask handling, and labels print on white stock anyway.
pub fn prepare_logo(bytes: &[u8]) -> Option<RawImage> {
    let decoded = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("logo image undecodable, skipping: {}", e);
            return None;
        }
    };

    let rgba = decoded.to_rgba8();
    let mut flattened = image::RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        flattened.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }

    let mut png = Vec::new();
    if let Err(e) = image::DynamicImage::ImageRgb8(flattened)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
    {
        log::warn!("logo re-encode failed, skipping: {}", e);
        return None;
    }

    let mut warnings = Vec::new();
    match RawImage::decode_from_bytes(&png, &mut warnings) {
        Ok(img) => Some(img),
        Err(e) => {
            log::warn!("logo not embeddable, skipping: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_prepare_valid_png() {
        let img = prepare_logo(&test_png(16, 8)).expect("valid PNG should decode");
        assert_eq!(img.width, 16);
        assert_eq!(img.height, 8);
    }

    #[test]
    fn test_prepare_garbage_returns_none() {
        assert!(prepare_logo(b"definitely not an image").is_none());
    }

    #[test]
    fn test_snapshot_missing_file_returns_none() {
        assert!(snapshot_logo(Path::new("/nonexistent/logo.png")).is_none());
    }
}
