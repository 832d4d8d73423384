//! Crop renderer
//!
//! Draws the source photo into a fixed-size white canvas using the
//! output-space rectangle from the coordinate mapper.

use crate::constants::{BACKGROUND_COLOR, CROP_JPEG_QUALITY};
use crate::io::encode_jpeg;
use crate::layout::{Rect, Size, output_rect};
use crate::session::Ticket;
use crate::types::*;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use std::sync::Arc;

/// A cropped photo at its final physical size
#[derive(Debug, Clone)]
pub struct CroppedResult {
    /// Raw pixels, `target.pixel_size()` in size
    pub image: RgbImage,
    /// JPEG encoding of `image`
    pub jpeg: Vec<u8>,
    /// Physical size the photo was rendered for
    pub target: CropTarget,
}

impl CroppedResult {
    pub fn suggested_filename(&self) -> String {
        self.target.suggested_filename()
    }
}

/// Everything needed to render a crop, captured when the user confirms
#[derive(Debug, Clone)]
pub struct CropJob {
    pub ticket: Ticket,
    pub source: Arc<ImageSource>,
    pub target: CropTarget,
    pub view: ViewTransform,
    /// Crop frame size the pan was recorded in
    pub preview: Size,
}

impl CropJob {
    pub fn run(&self) -> Result<CroppedResult> {
        render_crop(&self.source, &self.target, &self.view, self.preview)
    }
}

/// Render and encode a crop on the blocking pool
pub async fn render_crop_async(job: CropJob) -> Result<CroppedResult> {
    tokio::task::spawn_blocking(move || job.run()).await?
}

/// Render the cropped photo and encode it as JPEG
pub fn render_crop(
    source: &ImageSource,
    target: &CropTarget,
    view: &ViewTransform,
    preview: Size,
) -> Result<CroppedResult> {
    let image = rasterize_crop(source, target, view, preview)?;
    let jpeg = encode_jpeg(&image, CROP_JPEG_QUALITY)?;
    log::debug!(
        "Rendered {}x{} crop ({} bytes)",
        image.width(),
        image.height(),
        jpeg.len()
    );

    Ok(CroppedResult {
        image,
        jpeg,
        target: *target,
    })
}

/// Rasterize the crop without encoding
pub fn rasterize_crop(
    source: &ImageSource,
    target: &CropTarget,
    view: &ViewTransform,
    preview: Size,
) -> Result<RgbImage> {
    let (out_w, out_h) = target.checked_pixel_size()?;
    let mut canvas = RgbImage::from_pixel(out_w, out_h, Rgb(BACKGROUND_COLOR));

    let dest = output_rect(Size::new(out_w as f32, out_h as f32), preview, source.size(), view);
    draw_scaled(&mut canvas, &source.image, dest);
    Ok(canvas)
}

/// Draw `image` stretched into `dest`, clipped to the canvas.
///
/// Only the source pixels behind the visible part of `dest` are resampled.
/// Placement is snapped outward so an image that covers the canvas leaves
/// no blank edge pixels.
pub(crate) fn draw_scaled(canvas: &mut RgbImage, image: &RgbImage, dest: Rect) {
    let (src_w, src_h) = image.dimensions();
    let finite = [dest.x, dest.y, dest.width, dest.height]
        .iter()
        .all(|v| v.is_finite());
    if src_w == 0 || src_h == 0 || !finite || dest.width <= 0.0 || dest.height <= 0.0 {
        return;
    }

    let scale_x = dest.width / src_w as f32;
    let scale_y = dest.height / src_h as f32;

    let vis_x0 = dest.x.max(0.0);
    let vis_y0 = dest.y.max(0.0);
    let vis_x1 = dest.right().min(canvas.width() as f32);
    let vis_y1 = dest.bottom().min(canvas.height() as f32);
    if vis_x0 >= vis_x1 || vis_y0 >= vis_y1 {
        return;
    }

    let src_x0 = ((vis_x0 - dest.x) / scale_x).floor().clamp(0.0, src_w as f32) as u32;
    let src_y0 = ((vis_y0 - dest.y) / scale_y).floor().clamp(0.0, src_h as f32) as u32;
    let src_x1 = ((vis_x1 - dest.x) / scale_x).ceil().clamp(0.0, src_w as f32) as u32;
    let src_y1 = ((vis_y1 - dest.y) / scale_y).ceil().clamp(0.0, src_h as f32) as u32;
    if src_x1 <= src_x0 || src_y1 <= src_y0 {
        return;
    }

    let left = (dest.x + src_x0 as f32 * scale_x).floor();
    let top = (dest.y + src_y0 as f32 * scale_y).floor();
    let right = (dest.x + src_x1 as f32 * scale_x).ceil();
    let bottom = (dest.y + src_y1 as f32 * scale_y).ceil();
    let width = (right - left).max(1.0) as u32;
    let height = (bottom - top).max(1.0) as u32;

    let region =
        imageops::crop_imm(image, src_x0, src_y0, src_x1 - src_x0, src_y1 - src_y0).to_image();
    let scaled = if region.dimensions() == (width, height) {
        region
    } else {
        imageops::resize(&region, width, height, FilterType::CatmullRom)
    };

    imageops::overlay(canvas, &scaled, left as i64, top as i64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Vec2;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn solid(width: u32, height: u32, color: [u8; 3]) -> ImageSource {
        ImageSource::new(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn test_draw_scaled_offscreen_is_noop() {
        let mut canvas = RgbImage::from_pixel(10, 10, WHITE);
        let image = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        draw_scaled(&mut canvas, &image, Rect::new(50.0, 50.0, 4.0, 4.0));
        assert!(canvas.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_zoom_out_leaves_white_margin() {
        let source = solid(400, 400, [10, 20, 30]);
        let target = CropTarget::new(35.0, 35.0);
        let view = ViewTransform::new(0.5, Vec2::ZERO);
        let image =
            rasterize_crop(&source, &target, &view, Size::new(200.0, 200.0)).unwrap();

        assert_eq!(image.get_pixel(0, 0), &WHITE);
        let (w, h) = image.dimensions();
        assert_eq!(image.get_pixel(w / 2, h / 2), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_pan_moves_image_in_output_space() {
        // Left half red, right half blue
        let mut img = RgbImage::from_pixel(200, 200, Rgb([255, 0, 0]));
        for x in 100..200 {
            for y in 0..200 {
                img.put_pixel(x, y, Rgb([0, 0, 255]));
            }
        }
        let source = ImageSource::new(img);
        let target = CropTarget::new(20.0, 20.0);

        // Pan right by a quarter of a 100px preview: the output shifts by a
        // quarter of its own width
        let view = ViewTransform::new(1.0, Vec2::new(25.0, 0.0));
        let image =
            rasterize_crop(&source, &target, &view, Size::new(100.0, 100.0)).unwrap();
        let (w, h) = image.dimensions();

        assert_eq!(image.get_pixel(2, h / 2), &WHITE);
        assert_eq!(image.get_pixel(w / 2, h / 2), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_render_is_idempotent() {
        let source = solid(300, 500, [200, 100, 50]);
        let target = CropTarget::default();
        let view = ViewTransform::new(1.7, Vec2::new(-12.0, 7.5));
        let preview = Size::new(210.0, 270.0);

        let a = render_crop(&source, &target, &view, preview).unwrap();
        let b = render_crop(&source, &target, &view, preview).unwrap();
        assert_eq!(a.image, b.image);
        assert_eq!(a.jpeg, b.jpeg);
    }
}
