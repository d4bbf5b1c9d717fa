//! Common geometry and colour types for the raster image core.
//!
//! This crate provides the small value types shared by every image variant:
//! - [`Vec2`] - unsigned 2D size or position
//! - [`Rect`] - rectangle with unsigned position and dimensions
//! - [`Colour`] - RGBA colour with an explicit alpha channel

use std::fmt;

/// An unsigned 2D vector, used both for image sizes and pixel positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Vec2 {
    pub x: u32,
    pub y: u32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new vector.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Number of pixels covered when this vector is read as a size.
    pub const fn area(&self) -> usize {
        self.x as usize * self.y as usize
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise subtraction that stops at zero.
    pub fn saturating_sub(self, other: Self) -> Self {
        Self::new(self.x.saturating_sub(other.x), self.y.saturating_sub(other.y))
    }

    /// Check if this position lies inside an area of the given size.
    pub const fn is_within(&self, size: Vec2) -> bool {
        self.x < size.x && self.y < size.y
    }
}

impl From<(u32, u32)> for Vec2 {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

/// A rectangle defined by top-left position and dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// The zero-area rectangle at the origin.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// Create a new rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole area of the given size.
    pub const fn from_size(size: Vec2) -> Self {
        Self::new(0, 0, size.x, size.y)
    }

    /// Top-left corner.
    pub const fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Dimensions as a vector.
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Get the right edge (x + width), exclusive.
    pub const fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Get the bottom edge (y + height), exclusive.
    pub const fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Check if a point is contained within this rectangle.
    pub const fn contains_point(&self, px: u32, py: u32) -> bool {
        px >= self.x && (px as u64) < self.right() && py >= self.y && (py as u64) < self.bottom()
    }

    /// Check if `other` lies entirely inside this rectangle.
    ///
    /// An empty `other` is contained when its position lies within this
    /// rectangle or on its right/bottom edge.
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        if other.is_empty() {
            return other.x >= self.x
                && other.y >= self.y
                && other.x as u64 <= self.right()
                && other.y as u64 <= self.bottom();
        }
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// True when the rectangle covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get the area of the rectangle.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{},{},{}}}", self.x, self.y, self.width, self.height)
    }
}

/// An RGBA colour, 8 bits per channel, straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Fully transparent black, the default fill for RGB images.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create a colour from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Channels as `[R, G, B, A]`.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from `[R, G, B, A]`.
    pub const fn from_array(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    /// True when the alpha channel is zero.
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl From<[u8; 4]> for Colour {
    fn from(rgba: [u8; 4]) -> Self {
        Self::from_array(rgba)
    }
}

impl From<Colour> for [u8; 4] {
    fn from(c: Colour) -> Self {
        c.to_array()
    }
}
