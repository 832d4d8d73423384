//! Print sheet renderer
//!
//! Tiles copies of the cropped photo across the sheet in row-major order,
//! with a light gray outline around each copy as a cut guide.

use crate::constants::{BACKGROUND_COLOR, CUT_GUIDE_COLOR, SHEET_JPEG_QUALITY};
use crate::io::encode_jpeg;
use crate::layout::{SheetLayout, SheetStatistics, compute_sheet_layout, sheet_statistics};
use crate::types::*;
use image::imageops;
use image::{Rgb, RgbImage};
use std::sync::Arc;

use super::CroppedResult;

/// A rendered print sheet
#[derive(Debug, Clone)]
pub struct PrintSheet {
    pub image: RgbImage,
    /// JPEG encoding of `image`
    pub jpeg: Vec<u8>,
    pub layout: SheetLayout,
    pub config: SheetConfig,
}

impl PrintSheet {
    /// Number of photos placed on the sheet
    pub fn photos_count(&self) -> usize {
        self.layout.photos_count()
    }

    pub fn statistics(&self) -> SheetStatistics {
        sheet_statistics(&self.layout)
    }

    pub fn suggested_filename(&self) -> String {
        self.config.suggested_filename()
    }
}

/// Identifies the session state a sheet render was started from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetTicket {
    /// Image generation at job start
    pub generation: u64,
    /// Revision of the cropped photo being tiled
    pub crop_revision: u64,
    pub config: SheetConfig,
}

/// Everything needed to render a sheet off the session
#[derive(Debug, Clone)]
pub struct SheetJob {
    pub ticket: SheetTicket,
    pub crop: Arc<CroppedResult>,
}

impl SheetJob {
    pub fn run(&self) -> Result<PrintSheet> {
        render_sheet(&self.crop.image, &self.ticket.config)
    }

    /// Run on the blocking pool
    pub async fn run_async(self) -> Result<PrintSheet> {
        tokio::task::spawn_blocking(move || self.run()).await?
    }
}

/// Render and encode a sheet on the blocking pool
pub async fn render_sheet_async(
    crop: Arc<CroppedResult>,
    config: SheetConfig,
) -> Result<PrintSheet> {
    tokio::task::spawn_blocking(move || render_sheet(&crop.image, &config)).await?
}

/// Tile `tile` across a sheet described by `config` and encode it as JPEG
pub fn render_sheet(tile: &RgbImage, config: &SheetConfig) -> Result<PrintSheet> {
    config.checked_pixel_size()?;
    let layout = compute_sheet_layout(config, tile.width(), tile.height());
    let image = rasterize_sheet(tile, &layout)?;
    let jpeg = encode_jpeg(&image, SHEET_JPEG_QUALITY)?;
    log::debug!(
        "Rendered {} sheet: {}x{} grid, {} photos",
        config.preset.name(),
        layout.cols,
        layout.rows,
        layout.photos_count()
    );

    Ok(PrintSheet {
        image,
        jpeg,
        layout,
        config: *config,
    })
}

/// Rasterize a computed layout without encoding
pub fn rasterize_sheet(tile: &RgbImage, layout: &SheetLayout) -> Result<RgbImage> {
    check_raster_size("Sheet", layout.sheet_width_px, layout.sheet_height_px)?;
    let mut sheet = RgbImage::from_pixel(
        layout.sheet_width_px,
        layout.sheet_height_px,
        Rgb(BACKGROUND_COLOR),
    );

    for pos in &layout.positions {
        let x = pos.x.round() as i64;
        let y = pos.y.round() as i64;
        imageops::overlay(&mut sheet, tile, x, y);
        stroke_rect(
            &mut sheet,
            x,
            y,
            tile.width(),
            tile.height(),
            Rgb(CUT_GUIDE_COLOR),
        );
    }

    Ok(sheet)
}

/// Draw a 1px outline along the edge pixels of a rectangle, clipped to the canvas
fn stroke_rect(canvas: &mut RgbImage, x: i64, y: i64, width: u32, height: u32, color: Rgb<u8>) {
    if width == 0 || height == 0 {
        return;
    }

    let right = x + width as i64 - 1;
    let bottom = y + height as i64 - 1;
    let mut plot = |px: i64, py: i64| {
        if px >= 0 && py >= 0 && (px as u32) < canvas.width() && (py as u32) < canvas.height() {
            canvas.put_pixel(px as u32, py as u32, color);
        }
    };

    for px in x..=right {
        plot(px, y);
        plot(px, bottom);
    }
    for py in y..=bottom {
        plot(x, py);
        plot(right, py);
    }
}
