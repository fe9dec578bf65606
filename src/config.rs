//! Configuration for an icon.
//!
//! [`IconConfig`] holds everything that controls how an icon looks and
//! behaves: its dimensions, colors, caption layout, the drag and
//! double-click thresholds, and where icon artwork is looked up.
//!
//! The defaults describe a 32x32 icon with a one pixel black frame and
//! a 20 pixel caption band underneath.
//!
//! # Example
//!
//! ```rust
//! use iconify::config::IconConfig;
//! use iconify::types::Size;
//!
//! let config = IconConfig::builder()
//!     .border(2)
//!     .show_caption(false)
//!     .finish()
//!     .expect("invalid config");
//!
//! assert_eq!(config.window_size(), Size::new(36, 36));
//! ```

use std::path::{Path, PathBuf};

use bitflags::bitflags;

use crate::core::types::{Color, Point, Rectangle, Size};
use crate::{IconError::*, Result};

/// The default border width, in pixels.
pub const DEFAULT_BORDER: u32 = 1;
/// The default width and height of the icon image, in pixels.
pub const DEFAULT_SIZE: u32 = 32;
/// The default height of the caption band.
pub const CAPTION_HEIGHT: u32 = 20;
/// How far from the left edge of the caption band the text starts.
pub const CAPTION_LEFT: i32 = 5;
/// The distance from the top of the caption band to the text baseline.
pub const CAPTION_BASELINE: i32 = 15;
/// Where the icon goes if the original window's position is unusable.
pub const FALLBACK_POSITION: Point = Point::new(240, 240);
/// The furthest the pointer may travel between press and release
/// for the gesture to still count as a click.
pub const CLICK_THRESHOLD: u32 = 5;
/// The longest interval between two clicks that forms a double-click.
pub const DOUBLE_CLICK_MS: u32 = 500;
/// The directory searched for per-class icons.
pub const PIXMAP_DIR: &str = "/usr/share/pixmaps";
/// The icon used when nothing better is found.
pub const DEFAULT_ICON: &str = "/usr/share/pixmaps/default.xpm";

// the X protocol limits window dimensions to 16 bits
const MAX_DIMENSION: u32 = u16::MAX as u32;

bitflags! {
    /// The layers drawn when an icon is painted, bottom to top.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Layers: u8 {
        /// Clearing the window to the neutral color.
        const BACKGROUND = 1 << 0;
        /// The frame around the icon.
        const BORDER     = 1 << 1;
        /// The scaled icon image.
        const IMAGE      = 1 << 2;
        /// The caption band and its text.
        const CAPTION    = 1 << 3;
    }
}

/// The configuration of an icon.
///
/// Construct it with [`IconConfig::builder`], or use the default.
#[derive(Debug, Clone, PartialEq)]
pub struct IconConfig {
    pub(crate) border: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) show_caption: bool,
    pub(crate) caption_bg: Color,
    pub(crate) caption_fg: Color,
    pub(crate) frame: Color,
    pub(crate) neutral: Color,
    pub(crate) caption_height: u32,
    pub(crate) caption_left: i32,
    pub(crate) caption_baseline: i32,
    pub(crate) fallback: Point,
    pub(crate) click_threshold: u32,
    pub(crate) double_click_ms: u32,
    pub(crate) layers: Layers,
    pub(crate) pixmap_dir: PathBuf,
    pub(crate) default_icon: PathBuf,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            border: DEFAULT_BORDER,
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            show_caption: true,
            caption_bg: Color::WHITE,
            caption_fg: Color::BLACK,
            frame: Color::BLACK,
            neutral: Color::WHITE,
            caption_height: CAPTION_HEIGHT,
            caption_left: CAPTION_LEFT,
            caption_baseline: CAPTION_BASELINE,
            fallback: FALLBACK_POSITION,
            click_threshold: CLICK_THRESHOLD,
            double_click_ms: DOUBLE_CLICK_MS,
            layers: Layers::all(),
            pixmap_dir: PathBuf::from(PIXMAP_DIR),
            default_icon: PathBuf::from(DEFAULT_ICON),
        }
    }
}

impl IconConfig {
    /// Returns the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an [`IconConfigBuilder`] to build your config with the
    /// 'builder' idiom.
    pub fn builder() -> IconConfigBuilder {
        IconConfigBuilder::new()
    }

    /// Checks the configuration to verify that all invariants are upheld.
    ///
    /// The icon image must have a non-zero size, the caption band must
    /// have a non-zero height if captions are shown, and the whole
    /// window must fit within the dimensions the X server allows.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(InvalidConfig(format!(
                "icon size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.show_caption && self.caption_height == 0 {
            return Err(InvalidConfig(
                "caption height must be non-zero when captions are shown".into(),
            ));
        }

        let (width, height) = self.window_dimensions();
        if width > MAX_DIMENSION as u64 || height > MAX_DIMENSION as u64 {
            return Err(InvalidConfig(format!(
                "icon window of {}x{} is too large",
                width, height
            )));
        }

        Ok(())
    }

    fn window_dimensions(&self) -> (u64, u64) {
        let border = self.border as u64 * 2;
        (
            self.width as u64 + border,
            self.height as u64 + border + self.caption_band() as u64,
        )
    }

    /// The thickness of the frame, in pixels.
    pub fn border(&self) -> u32 {
        self.border
    }

    /// The size of the icon image.
    pub fn content_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the caption band is shown.
    pub fn show_caption(&self) -> bool {
        self.show_caption
    }

    /// The height of the caption band, or zero if it is not shown.
    pub fn caption_band(&self) -> u32 {
        if self.show_caption {
            self.caption_height
        } else {
            0
        }
    }

    /// The background color of the caption band.
    pub fn caption_bg(&self) -> Color {
        self.caption_bg
    }

    /// The color of the caption text.
    pub fn caption_fg(&self) -> Color {
        self.caption_fg
    }

    /// The color of the frame.
    pub fn frame(&self) -> Color {
        self.frame
    }

    /// The color the window is cleared to.
    pub fn neutral(&self) -> Color {
        self.neutral
    }

    /// The position used when the original window's position
    /// cannot be used.
    pub fn fallback(&self) -> Point {
        self.fallback
    }

    /// The click threshold, in pixels.
    pub fn click_threshold(&self) -> u32 {
        self.click_threshold
    }

    /// The double-click interval, in milliseconds.
    pub fn double_click_ms(&self) -> u32 {
        self.double_click_ms
    }

    /// The layers that are drawn.
    pub fn layers(&self) -> Layers {
        self.layers
    }

    /// The directory searched for per-class icons.
    pub fn pixmap_dir(&self) -> &Path {
        &self.pixmap_dir
    }

    /// The icon used if nothing else is found.
    pub fn default_icon(&self) -> &Path {
        &self.default_icon
    }

    //* geometry of the icon window, relative to its origin

    /// The total size of the icon window.
    ///
    /// This is the image size plus the frame on every side,
    /// plus the caption band if it is shown.
    pub fn window_size(&self) -> Size {
        let (width, height) = self.window_dimensions();
        Size::new(width as u32, height as u32)
    }

    /// The whole icon window.
    pub fn window_rect(&self) -> Rectangle {
        Rectangle::from_parts(Point::new(0, 0), self.window_size())
    }

    /// The area inside the frame, including the caption band.
    pub fn inner_rect(&self) -> Rectangle {
        let border = self.border as i32;
        Rectangle::new(border, border, self.width, self.height + self.caption_band())
    }

    /// The area the icon image is drawn into.
    pub fn content_rect(&self) -> Rectangle {
        let border = self.border as i32;
        Rectangle::new(border, border, self.width, self.height)
    }

    /// The caption band, if captions are shown.
    pub fn caption_rect(&self) -> Option<Rectangle> {
        if !self.show_caption {
            return None;
        }
        let border = self.border as i32;
        Some(Rectangle::new(
            border,
            border + self.height as i32,
            self.width,
            self.caption_height,
        ))
    }

    /// Where the caption text baseline starts.
    pub fn caption_origin(&self) -> Point {
        let band = self.border as i32 + self.height as i32;
        Point::new(
            self.border as i32 + self.caption_left,
            band + self.caption_baseline,
        )
    }
}

/// A helper type to construct an [`IconConfig`].
#[derive(Debug, Default)]
pub struct IconConfigBuilder {
    inner: IconConfig,
}

impl IconConfigBuilder {
    /// Creates a new `IconConfigBuilder`.
    pub fn new() -> Self {
        Self {
            inner: IconConfig::default(),
        }
    }

    /// Sets the frame thickness, in pixels.
    pub fn border(mut self, border: u32) -> Self {
        self.inner.border = border;
        self
    }

    /// Sets the width of the icon image.
    pub fn width(mut self, width: u32) -> Self {
        self.inner.width = width;
        self
    }

    /// Sets the height of the icon image.
    pub fn height(mut self, height: u32) -> Self {
        self.inner.height = height;
        self
    }

    /// Sets whether the caption band is shown.
    pub fn show_caption(mut self, show_caption: bool) -> Self {
        self.inner.show_caption = show_caption;
        self
    }

    /// Sets the background color of the caption band.
    pub fn caption_bg(mut self, color: Color) -> Self {
        self.inner.caption_bg = color;
        self
    }

    /// Sets the color of the caption text.
    pub fn caption_fg(mut self, color: Color) -> Self {
        self.inner.caption_fg = color;
        self
    }

    /// Sets the color of the frame.
    pub fn frame(mut self, color: Color) -> Self {
        self.inner.frame = color;
        self
    }

    /// Sets the color the window is cleared to.
    pub fn neutral(mut self, color: Color) -> Self {
        self.inner.neutral = color;
        self
    }

    /// Sets the caption band layout: its height, the left margin of the
    /// text and the offset of the baseline from the top of the band.
    pub fn caption_layout(mut self, height: u32, left: i32, baseline: i32) -> Self {
        self.inner.caption_height = height;
        self.inner.caption_left = left;
        self.inner.caption_baseline = baseline;
        self
    }

    /// Sets the fallback position.
    pub fn fallback(mut self, fallback: Point) -> Self {
        self.inner.fallback = fallback;
        self
    }

    /// Sets the click threshold, in pixels.
    pub fn click_threshold(mut self, px: u32) -> Self {
        self.inner.click_threshold = px;
        self
    }

    /// Sets the double-click interval, in milliseconds.
    pub fn double_click_ms(mut self, ms: u32) -> Self {
        self.inner.double_click_ms = ms;
        self
    }

    /// Sets which layers are drawn.
    pub fn layers(mut self, layers: Layers) -> Self {
        self.inner.layers = layers;
        self
    }

    /// Sets the directory searched for per-class icons.
    pub fn pixmap_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.inner.pixmap_dir = dir.into();
        self
    }

    /// Sets the icon used when nothing else is found.
    pub fn default_icon<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.inner.default_icon = path.into();
        self
    }

    /// Finishes construction, validates the config and returns
    /// it if validation is successful.
    pub fn finish(self) -> Result<IconConfig> {
        let config = self.inner;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_window_size() {
        let config = IconConfig::new();

        assert!(config.validate().is_ok());
        assert_eq!(config.window_size(), Size::new(34, 54));
        assert_eq!(config.content_rect(), Rectangle::new(1, 1, 32, 32));
        assert_eq!(config.inner_rect(), Rectangle::new(1, 1, 32, 52));
        assert_eq!(config.caption_rect(), Some(Rectangle::new(1, 33, 32, 20)));
        assert_eq!(config.caption_origin(), Point::new(6, 48));
    }

    #[test]
    fn test_window_height_invariant() {
        for border in [0, 1, 5] {
            for show_caption in [true, false] {
                let config = IconConfig::builder()
                    .border(border)
                    .width(40)
                    .height(24)
                    .show_caption(show_caption)
                    .finish()
                    .unwrap();

                let caption = if show_caption { CAPTION_HEIGHT } else { 0 };
                let size = config.window_size();

                assert_eq!(size.height, 24 + 2 * border + caption);
                assert_eq!(size.width, 40 + 2 * border);
            }
        }
    }

    #[test]
    fn test_no_caption_rect() {
        let config = IconConfig::builder().show_caption(false).finish().unwrap();

        assert_eq!(config.caption_rect(), None);
        assert_eq!(config.inner_rect(), config.content_rect());
    }

    #[test]
    fn test_validate_rejects() {
        assert!(matches!(
            IconConfig::builder().width(0).finish(),
            Err(InvalidConfig(_))
        ));
        assert!(matches!(
            IconConfig::builder().height(0).finish(),
            Err(InvalidConfig(_))
        ));
        assert!(matches!(
            IconConfig::builder().caption_layout(0, 5, 15).finish(),
            Err(InvalidConfig(_))
        ));
        assert!(matches!(
            IconConfig::builder().width(u16::MAX as u32).finish(),
            Err(InvalidConfig(_))
        ));

        // no caption, so its height doesn't matter
        assert!(IconConfig::builder()
            .show_caption(false)
            .caption_layout(0, 5, 15)
            .finish()
            .is_ok());
    }
}
