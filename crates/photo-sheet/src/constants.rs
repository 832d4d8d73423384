//! Shared constants for cropping and sheet tiling
//!
//! This module centralizes the physical-to-pixel conversion and the
//! fixed limits used by the crop editor and the print sheet.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Output raster density in pixels per millimeter (≈ 300 DPI)
pub const PIXELS_PER_MM: f32 = 11.81;

/// Convert millimeters to output pixels (fractional)
#[inline]
pub fn mm_to_px(mm: f32) -> f32 {
    mm * PIXELS_PER_MM
}

/// Convert millimeters to a whole raster dimension.
///
/// Fractional pixels are truncated, so 35mm becomes 413px and 45mm 531px.
#[inline]
pub fn mm_to_px_dim(mm: f32) -> u32 {
    let px = mm_to_px(mm);
    if px.is_finite() && px >= 1.0 {
        px.floor() as u32
    } else {
        1
    }
}

/// Longest raster side accepted for a photo or a sheet (about 1.39 m)
pub const MAX_RASTER_SIDE_PX: u32 = 16_384;

/// Largest raster area accepted for a photo or a sheet (A0 at 11.81 px/mm is ~139M)
pub const MAX_RASTER_PIXELS: u64 = 64_000_000;

// =============================================================================
// Crop Target
// =============================================================================

/// Default photo width in millimeters
pub const DEFAULT_CROP_WIDTH_MM: f32 = 35.0;

/// Default photo height in millimeters
pub const DEFAULT_CROP_HEIGHT_MM: f32 = 45.0;

/// Fraction of the viewport height the crop frame may occupy
pub const PREVIEW_MAX_HEIGHT_FRACTION: f32 = 0.55;

// =============================================================================
// Zoom
// =============================================================================

/// Smallest zoom relative to cover fit
pub const MIN_ZOOM: f32 = 0.5;

/// Largest zoom relative to cover fit
pub const MAX_ZOOM: f32 = 3.0;

/// Zoom change applied by the +/- buttons
pub const ZOOM_BUTTON_STEP: f32 = 0.1;

/// Granularity of the zoom slider
pub const ZOOM_SLIDER_STEP: f32 = 0.05;

// =============================================================================
// Print Sheet
// =============================================================================

/// Default page margin in millimeters
pub const DEFAULT_PAGE_MARGIN_MM: f32 = 5.0;

/// Default gap between photos in millimeters
pub const DEFAULT_PHOTO_GAP_MM: f32 = 2.0;

/// Cut guide color drawn around every tile (#cccccc)
pub const CUT_GUIDE_COLOR: [u8; 3] = [0xcc, 0xcc, 0xcc];

/// Canvas background
pub const BACKGROUND_COLOR: [u8; 3] = [0xff, 0xff, 0xff];

// =============================================================================
// Encoding
// =============================================================================

/// JPEG quality for a single cropped photo
pub const CROP_JPEG_QUALITY: u8 = 95;

/// JPEG quality for the print sheet (keeps file size bounded)
pub const SHEET_JPEG_QUALITY: u8 = 85;
