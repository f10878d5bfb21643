//! Placement geometry for fitting a source image onto the target canvas
//!
//! The image is pinned to one target dimension and centered on the other.
//! When the source is relatively wider than the target it is pinned to the
//! target height, otherwise to the target width. The scaled image therefore
//! always spans the pinned axis and overflows (is cropped on) the other one.

use crate::{MockupError, Result};

/// Largest accepted scale factor between source and target
pub const MAX_SCALE_FACTOR: f64 = 1.0e4;

/// Where and how large the source is drawn on the target canvas
///
/// Offsets may be negative: the overflowing part of the scaled image
/// falls outside the canvas and is cropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Scaled image width in pixels
    pub draw_width: f64,
    /// Scaled image height in pixels
    pub draw_height: f64,
    /// Left edge of the scaled image on the canvas
    pub offset_x: f64,
    /// Top edge of the scaled image on the canvas
    pub offset_y: f64,
    /// Uniform scale applied to the source
    pub scale: f64,
}

/// Integer rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Whole source pixels that reach the canvas, and where they are drawn
///
/// The destination keeps the placement's scale, so it may start before the
/// canvas origin or run past its far edge; drawing clips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DrawRegion {
    pub source: PixelRect,
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Compute the placement of a `source_width`x`source_height` image on a
    /// `target_width`x`target_height` canvas
    ///
    /// # Errors
    /// * `InvalidImage` if the source has a zero dimension
    /// * `InvalidTarget` if the target has a zero dimension
    /// * `ScaleOutOfRange` if the scale factor exceeds [`MAX_SCALE_FACTOR`]
    pub fn compute(
        source_width: u32,
        source_height: u32,
        target_width: u32,
        target_height: u32,
    ) -> Result<Self> {
        if source_width == 0 || source_height == 0 {
            return Err(MockupError::InvalidImage(format!(
                "source size must be positive, got {source_width}x{source_height}"
            )));
        }
        if target_width == 0 || target_height == 0 {
            return Err(MockupError::InvalidTarget(format!(
                "target size must be positive, got {target_width}x{target_height}"
            )));
        }

        let (sw, sh) = (source_width as f64, source_height as f64);
        let (tw, th) = (target_width as f64, target_height as f64);

        let img_ratio = sw / sh;
        let target_ratio = tw / th;

        let placement = if img_ratio > target_ratio {
            // Wider than the target: pin to height
            let scale = th / sh;
            let draw_width = sw * scale;
            Self {
                draw_width,
                draw_height: th,
                offset_x: (tw - draw_width) / 2.0,
                offset_y: 0.0,
                scale,
            }
        } else {
            // Taller or equal: pin to width
            let scale = tw / sw;
            let draw_height = sh * scale;
            Self {
                draw_width: tw,
                draw_height,
                offset_x: 0.0,
                offset_y: (th - draw_height) / 2.0,
                scale,
            }
        };

        if placement.scale > MAX_SCALE_FACTOR {
            return Err(MockupError::ScaleOutOfRange(placement.scale));
        }

        Ok(placement)
    }

    /// True when the scaled image overflows the canvas on some axis
    pub fn is_cropped(&self) -> bool {
        self.offset_x < 0.0 || self.offset_y < 0.0
    }

    /// True when the scaled image exactly matches the canvas
    pub fn is_exact_fit(&self) -> bool {
        self.offset_x == 0.0 && self.offset_y == 0.0
    }

    /// Clip the scaled image against the canvas
    ///
    /// Returns `None` if no part of the image overlaps the canvas.
    pub(crate) fn draw_region(
        &self,
        source_width: u32,
        source_height: u32,
        target_width: u32,
        target_height: u32,
    ) -> Option<DrawRegion> {
        let x = clip_axis(
            self.offset_x,
            self.draw_width,
            self.scale,
            source_width,
            target_width,
        )?;
        let y = clip_axis(
            self.offset_y,
            self.draw_height,
            self.scale,
            source_height,
            target_height,
        )?;

        Some(DrawRegion {
            source: PixelRect {
                x: x.src_start,
                y: y.src_start,
                width: x.src_len,
                height: y.src_len,
            },
            x: x.dst_start,
            y: y.dst_start,
            width: x.dst_len,
            height: y.dst_len,
        })
    }
}

/// One axis of a [`DrawRegion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisSpan {
    src_start: u32,
    src_len: u32,
    dst_start: i64,
    dst_len: u32,
}

fn clip_axis(
    offset: f64,
    draw_len: f64,
    scale: f64,
    source_len: u32,
    target_len: u32,
) -> Option<AxisSpan> {
    let start = offset.max(0.0);
    let end = (offset + draw_len).min(target_len as f64);
    if end <= start {
        return None;
    }

    // Widen to whole source pixels; the partial edge pixels stay at full scale
    let src_start = (((start - offset) / scale).floor().max(0.0) as u32).min(source_len - 1);
    let src_end = (((end - offset) / scale).ceil() as u32).clamp(src_start + 1, source_len);

    let dst_start = (offset + src_start as f64 * scale).round() as i64;
    let dst_end = (offset + src_end as f64 * scale).round() as i64;
    let dst_len = u32::try_from(dst_end - dst_start).ok().filter(|&len| len > 0)?;

    Some(AxisSpan {
        src_start,
        src_len: src_end - src_start,
        dst_start,
        dst_len,
    })
}
