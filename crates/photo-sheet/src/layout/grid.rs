//! Grid layout calculation
//!
//! This module decides how many copies of the cropped photo fit on a sheet
//! and where each copy goes.

use crate::constants::mm_to_px;
use crate::types::SheetConfig;

use super::{SheetLayout, SheetStatistics, Vec2};

// =============================================================================
// Tile Counts
// =============================================================================

/// Number of tiles that fit along one axis.
///
/// `available = sheet - 2 * margin`, then `floor((available + gap) / (tile + gap))`,
/// never below zero.
pub fn tile_count(sheet_px: f32, tile_px: f32, margin_px: f32, gap_px: f32) -> usize {
    let available = sheet_px - 2.0 * margin_px;
    let step = tile_px + gap_px;
    if !available.is_finite() || !step.is_finite() || step <= 0.0 || tile_px <= 0.0 {
        return 0;
    }

    let count = ((available + gap_px) / step).floor();
    if count <= 0.0 { 0 } else { count as usize }
}

// =============================================================================
// Grid Creation
// =============================================================================

/// Compute the tile grid for a tile of `tile_w` × `tile_h` pixels.
///
/// Tiles are placed row-major from `(margin, margin)`, advancing by
/// `tile + gap` along each axis.
pub fn compute_sheet_layout(config: &SheetConfig, tile_w: u32, tile_h: u32) -> SheetLayout {
    let (sheet_w, sheet_h) = config.pixel_size();
    let margin = mm_to_px(config.margin_mm.max(0.0));
    let gap = mm_to_px(config.gap_mm.max(0.0));

    let cols = tile_count(sheet_w as f32, tile_w as f32, margin, gap);
    let rows = tile_count(sheet_h as f32, tile_h as f32, margin, gap);

    let mut positions = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        let y = margin + row as f32 * (tile_h as f32 + gap);
        for col in 0..cols {
            let x = margin + col as f32 * (tile_w as f32 + gap);
            positions.push(Vec2::new(x, y));
        }
    }

    SheetLayout {
        sheet_width_px: sheet_w,
        sheet_height_px: sheet_h,
        tile_width_px: tile_w,
        tile_height_px: tile_h,
        cols,
        rows,
        positions,
    }
}

/// Summarize a computed layout
pub fn sheet_statistics(layout: &SheetLayout) -> SheetStatistics {
    let sheet_area = layout.sheet_width_px as f64 * layout.sheet_height_px as f64;
    let tile_area = layout.tile_width_px as f64 * layout.tile_height_px as f64;
    let used = if sheet_area > 0.0 {
        (tile_area * layout.photos_count() as f64 / sheet_area).min(1.0)
    } else {
        0.0
    };

    SheetStatistics {
        cols: layout.cols,
        rows: layout.rows,
        photos_count: layout.photos_count(),
        used_area_ratio: used as f32,
    }
}

// =============================================================================
// Tests
// =============================================================================
