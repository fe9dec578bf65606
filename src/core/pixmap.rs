//! Client-side images and nearest-neighbour scaling.
//!
//! A [`Pixmap`] holds its pixels in memory as `0xAARRGGBB` words.
//! Pixels with an alpha of zero are transparent, which is how the `None`
//! color of an XPM file is represented.
//!
//! Scaling is done on the client and the result is uploaded to the
//! server in one go, instead of copying the image one pixel at a time
//! with server-side requests.

use thiserror::Error;

use super::types::{Color, Size};

/// A fully transparent pixel.
pub const TRANSPARENT: u32 = 0x0000_0000;

const OPAQUE: u32 = 0xFF00_0000;

/// Errors produced when constructing or scaling a [`Pixmap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PixmapError {
    /// A pixmap cannot have a zero dimension.
    #[error("invalid pixmap dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),

    /// The pixel buffer does not match the given dimensions.
    #[error("expected {expected} pixels, got {got}")]
    SizeMismatch {
        #[allow(missing_docs)]
        expected: usize,
        #[allow(missing_docs)]
        got: usize,
    },
}

/// An image held in client memory.
#[derive(custom_debug_derive::Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    #[debug(skip)]
    pixels: Vec<u32>,
}

impl Pixmap {
    /// Creates a pixmap from a row-major buffer of `0xAARRGGBB` pixels.
    pub fn from_argb(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, PixmapError> {
        if width == 0 || height == 0 {
            return Err(PixmapError::InvalidDimensions(width, height));
        }

        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(PixmapError::SizeMismatch {
                expected,
                got: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates a pixmap filled with a single opaque color.
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self, PixmapError> {
        let len = width as usize * height as usize;
        Self::from_argb(width, height, vec![OPAQUE | color.as_u32(); len])
    }

    /// The width of the image in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height of the image in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The dimensions of the image.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The raw `0xAARRGGBB` pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        assert!(x < self.width && y < self.height, "pixel ({}, {}) out of bounds", x, y);
        self.pixels[(y * self.width + x) as usize]
    }

    /// The color of the pixel at `(x, y)`, or `None` if it is transparent.
    pub fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        let px = self.pixel(x, y);
        if px & OPAQUE == 0 {
            None
        } else {
            Some(Color::from_hex(px))
        }
    }

    /// A row of pixels.
    pub fn row(&self, y: u32) -> &[u32] {
        let start = (y * self.width) as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Resamples the image into a new pixmap of `width` by `height`
    /// using nearest-neighbour point sampling.
    ///
    /// The destination pixel `(x, y)` takes the value of the source pixel
    /// at `(floor(x * src_w / width), floor(y * src_h / height))`. No
    /// blending is done. The destination starts out filled with `background`,
    /// and transparent source pixels leave it as it is, so the result is
    /// always fully opaque.
    ///
    /// Scaling to the same dimensions produces an exact copy of every
    /// opaque pixel.
    pub fn scale(&self, width: u32, height: u32, background: Color) -> Result<Pixmap, PixmapError> {
        let mut scaled = Pixmap::filled(width, height, background)?;

        for y in 0..height {
            let src_y = sample(y, self.height, height);
            for x in 0..width {
                let src_x = sample(x, self.width, width);

                let px = self.pixel(src_x, src_y);
                if px & OPAQUE != 0 {
                    scaled.pixels[(y * width + x) as usize] = px | OPAQUE;
                }
            }
        }

        Ok(scaled)
    }
}

// floor(dst * src_len / dst_len), done in integers so it is exact
#[inline]
fn sample(dst: u32, src_len: u32, dst_len: u32) -> u32 {
    (dst as u64 * src_len as u64 / dst_len as u64) as u32
}

#[cfg(test)]
mod test {
    use super::*;

    fn gradient(width: u32, height: u32) -> Pixmap {
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| OPAQUE | (y << 8) | x))
            .collect();
        Pixmap::from_argb(width, height, pixels).unwrap()
    }

    #[test]
    fn test_scale_identity() {
        let src = gradient(7, 5);
        let scaled = src.scale(7, 5, Color::WHITE).unwrap();

        assert_eq!(scaled, src);
    }

    #[test]
    fn test_scale_double_width() {
        let src = gradient(4, 4);
        let scaled = src.scale(8, 4, Color::WHITE).unwrap();

        assert_eq!(scaled.size(), Size::new(8, 4));
        for y in 0..4 {
            for x in (0..8).step_by(2) {
                assert_eq!(scaled.pixel(x, y), src.pixel(x / 2, y));
                // point sampled, so the odd column repeats its neighbour
                assert_eq!(scaled.pixel(x + 1, y), src.pixel(x / 2, y));
            }
        }
    }

    #[test]
    fn test_scale_down() {
        let src = gradient(32, 32);
        let scaled = src.scale(10, 3, Color::WHITE).unwrap();

        assert_eq!(scaled.size(), Size::new(10, 3));
        // floor(9 * 32 / 10) = 28, floor(2 * 32 / 3) = 21
        assert_eq!(scaled.pixel(9, 2), src.pixel(28, 21));
        assert_eq!(scaled.pixel(0, 0), src.pixel(0, 0));
    }

    #[test]
    fn test_scale_output_dimensions() {
        let src = gradient(3, 2);
        for (w, h) in [(1, 1), (3, 2), (5, 9), (64, 1), (13, 48)] {
            let scaled = src.scale(w, h, Color::WHITE).unwrap();
            assert_eq!((scaled.width(), scaled.height()), (w, h));
        }
    }

    #[test]
    fn test_scale_zero_rejected() {
        let src = gradient(3, 3);

        assert_eq!(
            src.scale(0, 3, Color::WHITE),
            Err(PixmapError::InvalidDimensions(0, 3))
        );
        assert_eq!(
            src.scale(3, 0, Color::WHITE),
            Err(PixmapError::InvalidDimensions(3, 0))
        );
    }

    #[test]
    fn test_scale_transparent_keeps_background() {
        let src = Pixmap::from_argb(2, 1, vec![TRANSPARENT, OPAQUE | 0x123456]).unwrap();
        let scaled = src.scale(4, 2, Color::from_hex(0xeeeeee)).unwrap();

        assert_eq!(scaled.color_at(0, 0), Some(Color::from_hex(0xeeeeee)));
        assert_eq!(scaled.color_at(1, 1), Some(Color::from_hex(0xeeeeee)));
        assert_eq!(scaled.color_at(2, 0), Some(Color::from_hex(0x123456)));
        assert_eq!(scaled.color_at(3, 1), Some(Color::from_hex(0x123456)));
    }

    #[test]
    fn test_from_argb_mismatch() {
        assert_eq!(
            Pixmap::from_argb(2, 2, vec![0; 3]),
            Err(PixmapError::SizeMismatch {
                expected: 4,
                got: 3
            })
        );
    }
}
