use crate::constants::*;
use crate::layout::{Size, Vec2};
use image::RgbImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No image loaded")]
    NoImage,
    #[error("No cropped photo to tile")]
    NoCrop,
    #[error("Share failed: {0}")]
    Share(String),
}

pub type Result<T> = std::result::Result<T, PhotoError>;

/// Reject rasters beyond `MAX_RASTER_SIDE_PX` or `MAX_RASTER_PIXELS`
pub fn check_raster_size(what: &str, width: u32, height: u32) -> Result<()> {
    if width > MAX_RASTER_SIDE_PX
        || height > MAX_RASTER_SIDE_PX
        || width as u64 * height as u64 > MAX_RASTER_PIXELS
    {
        return Err(PhotoError::Config(format!(
            "{} of {}x{} px is too large (limit {} px per side, {} px total)",
            what, width, height, MAX_RASTER_SIDE_PX, MAX_RASTER_PIXELS
        )));
    }
    Ok(())
}

/// A decoded source photo.
///
/// Immutable once loaded; a new upload replaces it wholesale.
#[derive(Debug, Clone)]
pub struct ImageSource {
    pub image: RgbImage,
}

impl ImageSource {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Natural width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Natural height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Size {
        Size::from(self.image.dimensions())
    }
}

/// Physical size of the photo to produce
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CropTarget {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl Default for CropTarget {
    fn default() -> Self {
        Self {
            width_mm: DEFAULT_CROP_WIDTH_MM,
            height_mm: DEFAULT_CROP_HEIGHT_MM,
        }
    }
}

impl CropTarget {
    pub fn new(width_mm: f32, height_mm: f32) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }

    /// Output raster size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (mm_to_px_dim(self.width_mm), mm_to_px_dim(self.height_mm))
    }

    /// Output raster size, rejecting photos too large to allocate
    pub fn checked_pixel_size(&self) -> Result<(u32, u32)> {
        let (w, h) = self.pixel_size();
        check_raster_size("Photo", w, h)?;
        Ok((w, h))
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f32 {
        self.width_mm / self.height_mm
    }

    /// File name offered when saving a single photo
    pub fn suggested_filename(&self) -> String {
        format!("photo-{}x{}.jpg", self.width_mm, self.height_mm)
    }
}

/// Zoom and pan applied to the source image in the crop editor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewTransform {
    /// Multiplier on top of cover fit, always within `MIN_ZOOM..=MAX_ZOOM`
    pub zoom: f32,
    /// Offset in preview pixels
    pub pan: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn new(zoom: f32, pan: Vec2) -> Self {
        Self {
            zoom: clamp_zoom(zoom, 1.0),
            pan,
        }
    }
}

/// Clamp a zoom value into the allowed range; non-finite input yields `fallback`
pub fn clamp_zoom(zoom: f32, fallback: f32) -> f32 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        fallback.clamp(MIN_ZOOM, MAX_ZOOM)
    }
}

/// A numeric text field that may be empty or hold garbage.
///
/// Parsing never fails; anything that is not a number becomes `None`
/// and callers fall back to a default.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DimensionInput(pub Option<f32>);

impl DimensionInput {
    pub fn parse(text: &str) -> Self {
        let value = text.trim().parse::<f32>().ok().filter(|v| v.is_finite());
        Self(value)
    }

    pub fn value(self) -> Option<f32> {
        self.0
    }

    /// Positive value or `default`
    pub fn or_default(self, default: f32) -> f32 {
        match self.0 {
            Some(v) if v > 0.0 => v,
            _ => default,
        }
    }

    /// Non-negative value or zero, for margins and gaps
    pub fn or_zero(self) -> f32 {
        match self.0 {
            Some(v) if v > 0.0 => v,
            _ => 0.0,
        }
    }
}

impl From<f32> for DimensionInput {
    fn from(value: f32) -> Self {
        Self(Some(value).filter(|v| v.is_finite()))
    }
}

/// Paper presets offered for the print sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperPreset {
    #[default]
    A4,
    /// 10×15 cm photo paper
    #[cfg_attr(feature = "serde", serde(rename = "10x15"))]
    Photo10x15,
    A6,
    /// Dimensions entered by hand
    Custom,
}

impl PaperPreset {
    pub const ALL: [PaperPreset; 4] = [
        PaperPreset::A4,
        PaperPreset::Photo10x15,
        PaperPreset::A6,
        PaperPreset::Custom,
    ];

    /// Portrait dimensions, `None` for custom paper
    pub fn dimensions_mm(self) -> Option<(f32, f32)> {
        match self {
            PaperPreset::A4 => Some((210.0, 297.0)),
            PaperPreset::Photo10x15 => Some((100.0, 150.0)),
            PaperPreset::A6 => Some((105.0, 148.0)),
            PaperPreset::Custom => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaperPreset::A4 => "A4",
            PaperPreset::Photo10x15 => "10x15",
            PaperPreset::A6 => "A6",
            PaperPreset::Custom => "Custom",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Print sheet configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetConfig {
    pub preset: PaperPreset,
    pub paper_width_mm: f32,
    pub paper_height_mm: f32,
    pub margin_mm: f32,
    pub gap_mm: f32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::from_preset(PaperPreset::A4)
    }
}

impl SheetConfig {
    /// Default margins and gap on the given paper
    pub fn from_preset(preset: PaperPreset) -> Self {
        let mut config = Self {
            preset: PaperPreset::A4,
            paper_width_mm: 210.0,
            paper_height_mm: 297.0,
            margin_mm: DEFAULT_PAGE_MARGIN_MM,
            gap_mm: DEFAULT_PHOTO_GAP_MM,
        };
        config.apply_preset(preset);
        config
    }

    /// Switch preset; custom keeps the current dimensions
    pub fn apply_preset(&mut self, preset: PaperPreset) {
        self.preset = preset;
        if let Some((w, h)) = preset.dimensions_mm() {
            self.paper_width_mm = w;
            self.paper_height_mm = h;
        }
    }

    /// Sheet raster size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            mm_to_px_dim(self.paper_width_mm),
            mm_to_px_dim(self.paper_height_mm),
        )
    }

    /// Sheet raster size, rejecting paper too large to allocate
    pub fn checked_pixel_size(&self) -> Result<(u32, u32)> {
        let (w, h) = self.pixel_size();
        check_raster_size("Paper", w, h)?;
        Ok((w, h))
    }

    /// File name offered when saving the sheet
    pub fn suggested_filename(&self) -> String {
        format!("print_sheet_{}.jpg", self.preset.name())
    }
}
