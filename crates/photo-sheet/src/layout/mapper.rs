//! Coordinate mapping between the crop preview and the output raster
//!
//! The preview and the output canvas show the same framing at different
//! pixel densities. Both start from a "cover" fit of the source image into
//! their own box, multiply by the user zoom, center, then offset by the pan.
//! The pan is recorded in preview pixels, so before it is applied to the
//! output canvas it is rescaled by `output_width / preview_width`.

use crate::constants::PREVIEW_MAX_HEIGHT_FRACTION;
use crate::types::{CropTarget, ViewTransform};

use super::{Rect, Size, Vec2};

// =============================================================================
// Scale
// =============================================================================

/// Smallest scale at which the source fully covers the target box.
///
/// Returns 1.0 when any dimension is zero, negative or not finite.
pub fn base_scale(target_w: f32, target_h: f32, source_w: f32, source_h: f32) -> f32 {
    let dims = [target_w, target_h, source_w, source_h];
    if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
        return 1.0;
    }
    (target_w / source_w).max(target_h / source_h)
}

/// Cover-fit scale multiplied by the user zoom
#[inline]
pub fn final_scale(base: f32, zoom: f32) -> f32 {
    base * zoom
}

/// Factor that converts a preview-pixel offset into output pixels.
///
/// Returns 1.0 until the preview has been measured.
pub fn pan_scale(output_width: f32, preview_width: f32) -> f32 {
    if !output_width.is_finite() || !preview_width.is_finite() || preview_width <= 0.0 {
        return 1.0;
    }
    output_width / preview_width
}

// =============================================================================
// Draw Rectangles
// =============================================================================

/// Rectangle the source occupies inside `target`: scaled to cover, zoomed,
/// centered, then shifted by `offset` (already in target pixels).
pub fn draw_rect(target: Size, source: Size, zoom: f32, offset: Vec2) -> Rect {
    let base = base_scale(target.width, target.height, source.width, source.height);
    let scale = final_scale(base, zoom);

    let draw_w = source.width * scale;
    let draw_h = source.height * scale;

    Rect::new(
        (target.width - draw_w) / 2.0 + offset.x,
        (target.height - draw_h) / 2.0 + offset.y,
        draw_w,
        draw_h,
    )
}

/// Where the source image sits inside the on-screen crop frame
pub fn preview_rect(container: Size, source: Size, view: &ViewTransform) -> Rect {
    draw_rect(container, source, view.zoom, view.pan)
}

/// Where the source image is drawn on the output canvas.
///
/// `preview` is the crop frame the pan was recorded in.
pub fn output_rect(output: Size, preview: Size, source: Size, view: &ViewTransform) -> Rect {
    let offset = view.pan * pan_scale(output.width, preview.width);
    draw_rect(output, source, view.zoom, offset)
}

// =============================================================================
// Preview Frame
// =============================================================================

/// On-screen size of the crop frame.
///
/// The frame keeps the target's aspect ratio, fills `available_width` and
/// is never taller than a fixed fraction of the viewport height.
pub fn preview_frame(target: &CropTarget, available_width: f32, viewport_height: f32) -> Size {
    let ratio = target.aspect_ratio();
    if !ratio.is_finite() || ratio <= 0.0 {
        return Size::default();
    }

    let max_width = PREVIEW_MAX_HEIGHT_FRACTION * viewport_height * ratio;
    let width = available_width.min(max_width).max(0.0);
    Size::new(width, width / ratio)
}

// =============================================================================
// Tests
// =============================================================================
