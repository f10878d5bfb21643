//! Target canvas configuration

use crate::placement::Placement;
use crate::source::{SourceImage, MAX_DIMENSION};
use crate::{MockupError, Result};
use serde::{Deserialize, Serialize};

/// Largest accepted canvas area in pixels
pub const MAX_TARGET_PIXELS: u64 = 100_000_000;

/// Screen texture shown before the user loads an image
pub const DEFAULT_SCREEN_TEXTURE: &str = "/screenip12.jpg";

/// Opaque RGB color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from 8-bit channels
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// White color
    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Channels as an opaque RGBA pixel
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Encoding of the fitted canvas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "codec", rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG, quality in [0, 1]
    Jpeg {
        #[serde(default = "default_quality")]
        quality: f32,
    },
    /// Lossless PNG
    Png,
}

fn default_quality() -> f32 {
    0.92
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg {
            quality: default_quality(),
        }
    }
}

impl OutputFormat {
    /// MIME type of the encoded output
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    /// JPEG quality on the encoder's 1-100 scale
    pub(crate) fn jpeg_quality(quality: f32) -> u8 {
        (quality * 100.0).round().clamp(1.0, 100.0) as u8
    }

    fn validate(&self) -> Result<()> {
        if let OutputFormat::Jpeg { quality } = *self {
            if !(0.0..=1.0).contains(&quality) {
                return Err(MockupError::InvalidTarget(format!(
                    "JPEG quality {quality} is outside [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Target canvas: size, background and output encoding
///
/// Every field is optional in JSON and falls back to the
/// iPhone 13 Pro screen texture (1542x3334, black, JPEG 0.92).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetSpec {
    /// Canvas width in pixels
    pub target_width: u32,
    /// Canvas height in pixels
    pub target_height: u32,
    /// Fill for every pixel the image does not cover
    pub background_color: Rgb,
    /// Output codec
    pub output_format: OutputFormat,
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self::iphone_13_pro()
    }
}

impl TargetSpec {
    /// Screen texture resolution of the iPhone 13 Pro model
    pub fn iphone_13_pro() -> Self {
        Self {
            target_width: 1542,
            target_height: 3334,
            background_color: Rgb::black(),
            output_format: OutputFormat::default(),
        }
    }

    /// Create a spec with custom dimensions and default background/encoding
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
            ..Self::default()
        }
    }

    /// Set the background color
    pub fn with_background(mut self, color: Rgb) -> Self {
        self.background_color = color;
        self
    }

    /// Set the output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Parse and validate a spec from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: TargetSpec =
            serde_json::from_str(json).map_err(|e| MockupError::ConfigError(e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check dimensions and codec parameters
    ///
    /// Runs before any canvas is allocated, so an oversized target fails
    /// here instead of in the allocator.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = (self.target_width, self.target_height);
        if width == 0 || height == 0 {
            return Err(MockupError::InvalidTarget(format!(
                "target size must be positive, got {width}x{height}"
            )));
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(MockupError::InvalidTarget(format!(
                "target size {width}x{height} exceeds {MAX_DIMENSION}x{MAX_DIMENSION}"
            )));
        }
        if width as u64 * height as u64 > MAX_TARGET_PIXELS {
            return Err(MockupError::InvalidTarget(format!(
                "target size {width}x{height} exceeds {MAX_TARGET_PIXELS} pixels"
            )));
        }
        self.output_format.validate()
    }

    /// Placement of `source` on this canvas
    pub fn placement(&self, source: &SourceImage) -> Result<Placement> {
        Placement::compute(
            source.width(),
            source.height(),
            self.target_width,
            self.target_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_iphone_13_pro() {
        let spec = TargetSpec::default();
        assert_eq!(spec.target_width, 1542);
        assert_eq!(spec.target_height, 3334);
        assert_eq!(spec.background_color, Rgb::black());
        assert_eq!(spec.output_format, OutputFormat::Jpeg { quality: 0.92 });
    }

    #[test]
    fn test_from_json_full() {
        let json = r#"{
            "targetWidth": 100,
            "targetHeight": 200,
            "backgroundColor": { "r": 255, "g": 255, "b": 255 },
            "outputFormat": { "codec": "png" }
        }"#;

        let spec = TargetSpec::from_json(json).unwrap();
        assert_eq!(spec.target_width, 100);
        assert_eq!(spec.target_height, 200);
        assert_eq!(spec.background_color, Rgb::white());
        assert_eq!(spec.output_format, OutputFormat::Png);
    }

    #[test]
    fn test_from_json_defaults() {
        let spec = TargetSpec::from_json("{}").unwrap();
        assert_eq!(spec, TargetSpec::iphone_13_pro());

        let spec = TargetSpec::from_json(r#"{ "outputFormat": { "codec": "jpeg" } }"#).unwrap();
        assert_eq!(spec.output_format, OutputFormat::Jpeg { quality: 0.92 });
    }

    #[test]
    fn test_from_json_rejects_zero_size() {
        let err = TargetSpec::from_json(r#"{ "targetWidth": 0 }"#).unwrap_err();
        assert!(matches!(err, MockupError::InvalidTarget(_)));
    }

    #[test]
    fn test_from_json_rejects_oversized_target() {
        let json = r#"{ "targetWidth": 300000000, "targetHeight": 70000 }"#;
        let err = TargetSpec::from_json(json).unwrap_err();
        assert!(matches!(err, MockupError::InvalidTarget(_)));

        // Each side within bounds, area above the cap
        let err = TargetSpec::new(20_000, 20_000).validate().unwrap_err();
        assert!(matches!(err, MockupError::InvalidTarget(ref m) if m.contains("pixels")));

        assert!(TargetSpec::new(MAX_DIMENSION, 3000).validate().is_ok());
    }

    #[test]
    fn test_from_json_rejects_bad_quality() {
        let json = r#"{ "outputFormat": { "codec": "jpeg", "quality": 1.5 } }"#;
        let err = TargetSpec::from_json(json).unwrap_err();
        assert!(matches!(err, MockupError::InvalidTarget(_)));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = TargetSpec::from_json("{ not json").unwrap_err();
        assert!(matches!(err, MockupError::ConfigError(_)));

        let err = TargetSpec::from_json(r#"{ "outputFormat": { "codec": "gif" } }"#).unwrap_err();
        assert!(matches!(err, MockupError::ConfigError(_)));
    }

    #[test]
    fn test_jpeg_quality_scale() {
        assert_eq!(OutputFormat::jpeg_quality(0.92), 92);
        assert_eq!(OutputFormat::jpeg_quality(1.0), 100);
        assert_eq!(OutputFormat::jpeg_quality(0.0), 1);
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(OutputFormat::default().mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
    }

    #[test]
    fn test_builder() {
        let spec = TargetSpec::new(10, 20)
            .with_background(Rgb::new(1, 2, 3))
            .with_output_format(OutputFormat::Png);
        assert_eq!(spec.target_width, 10);
        assert_eq!(spec.target_height, 20);
        assert_eq!(spec.background_color.to_rgba(), [1, 2, 3, 255]);
        assert_eq!(spec.output_format, OutputFormat::Png);
    }
}
