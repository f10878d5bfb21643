//! Fitting a source image onto the target canvas

use crate::placement::Placement;
use crate::source::SourceImage;
use crate::spec::{OutputFormat, TargetSpec};
use crate::{MockupError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbImage, RgbaImage};

/// Resampling filter used when scaling the source
const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// Encoded result of a fit
///
/// Always exactly `target_width` x `target_height` pixels.
#[derive(Debug, Clone)]
pub struct FittedImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    placement: Placement,
    mime_type: &'static str,
}

impl FittedImage {
    /// Encoded bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take ownership of the encoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Canvas width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Geometry used to draw the source
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// MIME type of the encoding (e.g. "image/jpeg")
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }
}

/// Stateless fitter bound to a target spec
///
/// `fit` borrows the source and never mutates it, so one fitter can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ImageFitter {
    spec: TargetSpec,
}

impl ImageFitter {
    /// Create a fitter for `spec`
    pub fn new(spec: TargetSpec) -> Self {
        Self { spec }
    }

    /// Target spec in use
    pub fn spec(&self) -> &TargetSpec {
        &self.spec
    }

    /// Fit `source` onto the canvas and encode it
    pub fn fit(&self, source: &SourceImage) -> Result<FittedImage> {
        let (canvas, placement) = self.compose(source)?;
        let bytes = encode(&canvas, self.spec.output_format)?;

        tracing::debug!(
            width = canvas.width(),
            height = canvas.height(),
            size = bytes.len(),
            mime = self.spec.output_format.mime_type(),
            "encoded fitted image"
        );

        Ok(FittedImage {
            bytes,
            width: canvas.width(),
            height: canvas.height(),
            placement,
            mime_type: self.spec.output_format.mime_type(),
        })
    }

    /// Fit `source` onto the canvas without encoding
    pub fn render(&self, source: &SourceImage) -> Result<RgbImage> {
        self.compose(source).map(|(canvas, _)| canvas)
    }

    fn compose(&self, source: &SourceImage) -> Result<(RgbImage, Placement)> {
        self.spec.validate()?;
        let placement = self.spec.placement(source)?;

        let (tw, th) = (self.spec.target_width, self.spec.target_height);

        tracing::debug!(
            source_width = source.width(),
            source_height = source.height(),
            draw_width = placement.draw_width,
            draw_height = placement.draw_height,
            offset_x = placement.offset_x,
            offset_y = placement.offset_y,
            "computed placement"
        );

        let mut canvas = RgbaImage::from_pixel(tw, th, Rgba(self.spec.background_color.to_rgba()));

        // Only the source pixels that land on the canvas are resampled; the
        // scaled strip keeps the full scale and the overlay clips its edges
        if let Some(region) = placement.draw_region(source.width(), source.height(), tw, th) {
            let visible = source
                .image()
                .crop_imm(
                    region.source.x,
                    region.source.y,
                    region.source.width,
                    region.source.height,
                )
                .to_rgba8();
            let scaled = imageops::resize(&visible, region.width, region.height, RESIZE_FILTER);
            imageops::overlay(&mut canvas, &scaled, region.x, region.y);
        }

        Ok((DynamicImage::ImageRgba8(canvas).to_rgb8(), placement))
    }
}

fn encode(canvas: &RgbImage, format: OutputFormat) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    let encoded = match format {
        OutputFormat::Jpeg { quality } => {
            let encoder =
                JpegEncoder::new_with_quality(&mut bytes, OutputFormat::jpeg_quality(quality));
            canvas.write_with_encoder(encoder)
        }
        OutputFormat::Png => canvas.write_with_encoder(PngEncoder::new(&mut bytes)),
    };
    encoded.map_err(|e| MockupError::EncodingError(e.to_string()))?;

    Ok(bytes)
}
