//! Layout data types
//!
//! All coordinates are in pixels with the origin at the top-left corner
//! and y growing downwards, the same convention as the raster canvas.

use std::ops::{Add, Mul, Sub};

/// A width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, negative or not a number
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f32, height as f32)
    }
}

/// A 2D offset or point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// A rectangular area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether this rect fully covers `0..width` × `0..height`, within a
    /// thousandth of a pixel
    pub fn covers(&self, size: Size) -> bool {
        const TOLERANCE: f32 = 1e-3;
        self.x <= TOLERANCE
            && self.y <= TOLERANCE
            && self.right() >= size.width - TOLERANCE
            && self.bottom() >= size.height - TOLERANCE
    }
}

/// Grid of tiles placed on a print sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    /// Sheet width in pixels
    pub sheet_width_px: u32,
    /// Sheet height in pixels
    pub sheet_height_px: u32,
    pub tile_width_px: u32,
    pub tile_height_px: u32,
    /// Number of columns that fit (never negative)
    pub cols: usize,
    /// Number of rows that fit (never negative)
    pub rows: usize,
    /// Top-left corner of every tile, row-major
    pub positions: Vec<Vec2>,
}

impl SheetLayout {
    /// Total number of tiles on the sheet
    pub fn photos_count(&self) -> usize {
        self.cols * self.rows
    }
}

/// Summary of how well the photos use the sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetStatistics {
    pub cols: usize,
    pub rows: usize,
    pub photos_count: usize,
    /// Fraction of the sheet area covered by photos (0.0 ..= 1.0)
    pub used_area_ratio: f32,
}
