//! Mockup Core - screen image fitting for device mockups
//!
//! This crate provides functionality for:
//! - Decoding uploaded screen images (JPEG, PNG)
//! - Computing a centered, aspect-preserving placement on a device screen
//! - Compositing the image onto a fixed-size canvas and encoding it
//! - Exporting rendered RGBA frames as PNG
//!
//! # Example
//!
//! ```ignore
//! use mockup_core::{ImageFitter, SourceImage, TargetSpec};
//!
//! let source = SourceImage::from_bytes(&std::fs::read("screenshot.png")?)?;
//! let fitter = ImageFitter::new(TargetSpec::default());
//! let fitted = fitter.fit(&source)?;
//! std::fs::write("screen.jpg", fitted.bytes())?;
//! ```

mod export;
mod fitter;
mod placement;
mod source;
mod spec;

pub use export::{export_png, mockup_file_name, EXPORT_FILE_PREFIX};
pub use fitter::{FittedImage, ImageFitter};
pub use placement::{Placement, MAX_SCALE_FACTOR};
pub use source::{SourceFormat, SourceImage, MAX_DIMENSION};
pub use spec::{OutputFormat, Rgb, TargetSpec, DEFAULT_SCREEN_TEXTURE, MAX_TARGET_PIXELS};

use thiserror::Error;

/// Errors that can occur while fitting or exporting images
#[derive(Debug, Error)]
pub enum MockupError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Scale factor {0} exceeds the allowed maximum")]
    ScaleOutOfRange(f64),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for mockup operations
pub type Result<T> = std::result::Result<T, MockupError>;
