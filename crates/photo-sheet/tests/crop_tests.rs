use image::{Rgb, RgbImage};
use photo_sheet::*;
use std::sync::Arc;

fn solid_source(width: u32, height: u32, color: [u8; 3]) -> ImageSource {
    ImageSource::new(RgbImage::from_pixel(width, height, Rgb(color)))
}

#[test]
fn test_portrait_upload_to_passport_photo() {
    let source = solid_source(1000, 2000, [180, 40, 40]);
    let target = CropTarget::new(35.0, 45.0);
    let view = ViewTransform::default();

    let result = render_crop(&source, &target, &view, Size::new(280.0, 360.0)).unwrap();

    assert_eq!(result.image.dimensions(), (413, 531));
    // Covered edge to edge: no white background shows through
    assert!(result.image.pixels().all(|p| *p == Rgb([180, 40, 40])));
}

#[test]
fn test_cover_at_unit_zoom_for_many_shapes() {
    let target = CropTarget::new(35.0, 45.0);
    let view = ViewTransform::default();
    let color = [20, 140, 90];

    for (w, h) in [(1000, 2000), (3000, 2000), (413, 531), (50, 50), (7, 3000)] {
        let source = solid_source(w, h, color);
        let result = render_crop(&source, &target, &view, Size::new(210.0, 270.0)).unwrap();
        let (out_w, out_h) = result.image.dimensions();
        for (x, y) in [(0, 0), (out_w - 1, 0), (0, out_h - 1), (out_w - 1, out_h - 1)] {
            assert_eq!(
                result.image.get_pixel(x, y),
                &Rgb(color),
                "blank corner ({x}, {y}) for {w}x{h} source"
            );
        }
    }
}

#[test]
fn test_encoded_crop_decodes_to_configured_size() {
    let source = solid_source(640, 480, [1, 2, 3]);
    for (w_mm, h_mm) in [(35.0, 45.0), (30.0, 40.0), (50.0, 50.0), (25.5, 33.3)] {
        let target = CropTarget::new(w_mm, h_mm);
        let result =
            render_crop(&source, &target, &ViewTransform::default(), Size::new(100.0, 100.0))
                .unwrap();

        let decoded = decode_image(&result.jpeg).unwrap();
        let expected = (
            (w_mm * constants::PIXELS_PER_MM).floor() as u32,
            (h_mm * constants::PIXELS_PER_MM).floor() as u32,
        );
        assert_eq!((decoded.width(), decoded.height()), expected);
    }
}

#[test]
fn test_suggested_filename() {
    assert_eq!(CropTarget::new(35.0, 45.0).suggested_filename(), "photo-35x45.jpg");
    assert_eq!(CropTarget::new(30.5, 40.0).suggested_filename(), "photo-30.5x40.jpg");
}

#[test]
fn test_panned_off_frame_leaves_white_canvas() {
    let source = solid_source(400, 400, [0, 0, 0]);
    let target = CropTarget::new(20.0, 20.0);
    let view = ViewTransform::new(1.0, Vec2::new(10_000.0, 0.0));

    let result = render_crop(&source, &target, &view, Size::new(100.0, 100.0)).unwrap();
    assert!(result.image.pixels().all(|p| *p == Rgb([255, 255, 255])));
}

#[tokio::test]
async fn test_async_render_matches_sync() {
    let source = Arc::new(solid_source(900, 1200, [60, 70, 80]));
    let job = CropJob {
        ticket: Ticket::default(),
        source: source.clone(),
        target: CropTarget::default(),
        view: ViewTransform::new(1.4, Vec2::new(3.0, -8.0)),
        preview: Size::new(210.0, 270.0),
    };

    let sync = job.run().unwrap();
    let async_result = render_crop_async(job).await.unwrap();
    assert_eq!(sync.image, async_result.image);
    assert_eq!(sync.jpeg, async_result.jpeg);
}

#[test]
fn test_huge_crop_size_is_rejected() {
    let source = solid_source(100, 100, [0, 0, 0]);
    let view = ViewTransform::default();

    let result = render_crop(
        &source,
        &CropTarget::new(1e9, 45.0),
        &view,
        Size::new(100.0, 100.0),
    );
    assert!(matches!(result, Err(PhotoError::Config(_))));
}
