//! Basic geometry and color types used throughout this crate.

use std::fmt;

/// A point on a 2D plane, usually relative to some window's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
}

impl Point {
    /// Creates a new Point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the offset from `self` to `other`.
    pub fn delta_to(&self, other: Point) -> (i32, i32) {
        (other.x - self.x, other.y - self.y)
    }

    /// Returns `self` translated by the given offsets.
    pub fn offset(&self, dx: i32, dy: i32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Whether either coordinate lies off the negative edge of the plane.
    pub fn is_negative(&self) -> bool {
        self.x < 0 || self.y < 0
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The dimensions of a rectangular area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    #[allow(missing_docs)]
    pub width: u32,
    #[allow(missing_docs)]
    pub height: u32,
}

impl Size {
    /// Creates a new Size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rectangle with its origin at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rectangle {
    /// The top-left corner.
    pub point: Point,
    /// The dimensions.
    pub size: Size,
}

impl Rectangle {
    /// Creates a new Rectangle.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            point: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Creates a Rectangle with all fields set to zero.
    pub const fn zeroed() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Creates a Rectangle from a point and a size.
    pub const fn from_parts(point: Point, size: Size) -> Self {
        Self { point, size }
    }
}

/// A color, stored as a 24-bit `0xRRGGBB` value.
///
/// This is the pixel value used with a TrueColor visual, so it can be
/// handed to the X server as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(u32);

impl Color {
    /// White, the neutral background.
    pub const WHITE: Color = Color(0xFFFFFF);
    /// Black.
    pub const BLACK: Color = Color(0x000000);

    /// Creates the Color from a 24-bit integer. Bits above the
    /// lowest 24 are discarded.
    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0xFFFFFF)
    }

    /// Creates the Color from its components.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Returns the (R, G, B) values of the Color as bytes.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let [_, r, g, b] = self.0.to_be_bytes();
        (r, g, b)
    }

    /// Expresses the Color as a hex string.
    pub fn as_string(&self) -> String {
        format!("#{:06x}", self.0)
    }

    /// Returns the color as a u32.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Color {
    fn from(from: u32) -> Self {
        Self::from_hex(from)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}
