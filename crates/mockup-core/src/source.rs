//! Source image decoding

use crate::{MockupError, Result};
use image::{DynamicImage, ImageError, ImageReader, Limits, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Largest accepted width or height of a decoded source.
/// Larger images are treated as decompression bombs.
pub const MAX_DIMENSION: u32 = 32768;

/// Detected source encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
}

impl SourceFormat {
    /// Detect the encoding from magic bytes
    pub fn detect(data: &[u8]) -> Result<Self> {
        if data.len() < 8 {
            return Err(MockupError::InvalidImage("Image data too short".to_string()));
        }

        // JPEG SOI: FF D8 FF
        if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
            return Ok(SourceFormat::Jpeg);
        }

        // PNG signature: 89 50 4E 47 0D 0A 1A 0A
        if data[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
            return Ok(SourceFormat::Png);
        }

        Err(MockupError::InvalidImage(
            "Unknown image format".to_string(),
        ))
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            SourceFormat::Jpeg => image::ImageFormat::Jpeg,
            SourceFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// A decoded raster supplied by the caller
///
/// Width and height are always positive.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    format: Option<SourceFormat>,
}

impl SourceImage {
    /// Decode an uploaded image (JPEG or PNG)
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let format = SourceFormat::detect(data)?;

        // Header dimensions are checked before any pixel buffer is allocated
        let mut limits = Limits::default();
        limits.max_image_width = Some(MAX_DIMENSION);
        limits.max_image_height = Some(MAX_DIMENSION);

        let mut reader = ImageReader::new(Cursor::new(data));
        reader.set_format(format.image_format());
        reader.limits(limits);
        let image = reader.decode().map_err(|e| match e {
            ImageError::Limits(limit) => MockupError::InvalidImage(format!(
                "source exceeds decode limit of {MAX_DIMENSION}x{MAX_DIMENSION}: {limit}"
            )),
            other => MockupError::InvalidImage(other.to_string()),
        })?;

        tracing::debug!(
            ?format,
            width = image.width(),
            height = image.height(),
            "decoded source image"
        );

        let mut source = Self::from_dynamic(image)?;
        source.format = Some(format);
        Ok(source)
    }

    /// Read and decode an image file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Wrap an already decoded image
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        check_dimensions(image.width(), image.height())?;
        Ok(Self {
            image,
            format: None,
        })
    }

    /// Wrap raw RGBA8 pixels (row-major, 4 bytes per pixel)
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        let image = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
            MockupError::InvalidImage(format!(
                "pixel buffer does not match {width}x{height} RGBA"
            ))
        })?;
        Self::from_dynamic(DynamicImage::ImageRgba8(image))
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encoding the image was decoded from, if it came from bytes
    pub fn format(&self) -> Option<SourceFormat> {
        self.format
    }

    /// Decoded pixels
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(MockupError::InvalidImage(format!(
            "source size must be positive, got {width}x{height}"
        )));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(MockupError::InvalidImage(format!(
            "source size {width}x{height} exceeds {MAX_DIMENSION}x{MAX_DIMENSION}"
        )));
    }
    Ok(())
}
