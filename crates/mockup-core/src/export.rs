//! PNG export of rendered mockup frames

use crate::{MockupError, Result};
use image::codecs::png::PngEncoder;
use image::RgbaImage;

/// File name prefix of exported mockups
pub const EXPORT_FILE_PREFIX: &str = "iphone-mockup";

/// Encode a rendered RGBA frame as PNG, keeping transparency
///
/// # Arguments
/// * `width` - Frame width in pixels
/// * `height` - Frame height in pixels
/// * `rgba` - Row-major RGBA8 pixels, `width * height * 4` bytes
pub fn export_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(MockupError::InvalidImage(format!(
            "frame size must be positive, got {width}x{height}"
        )));
    }

    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(MockupError::InvalidImage(format!(
            "frame buffer has {} bytes, expected {expected} for {width}x{height} RGBA",
            rgba.len()
        )));
    }

    let frame = RgbaImage::from_raw(width, height, rgba.to_vec()).ok_or_else(|| {
        MockupError::InvalidImage("frame buffer does not match dimensions".to_string())
    })?;

    let mut bytes = Vec::new();
    frame
        .write_with_encoder(PngEncoder::new(&mut bytes))
        .map_err(|e| MockupError::EncodingError(e.to_string()))?;

    tracing::debug!(width, height, size = bytes.len(), "exported mockup frame");

    Ok(bytes)
}

/// Download name for an export taken at `timestamp_ms` (Unix millis)
pub fn mockup_file_name(timestamp_ms: u64) -> String {
    format!("{EXPORT_FILE_PREFIX}-{timestamp_ms}.png")
}
