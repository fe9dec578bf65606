//! This module contains the core types used within iconify.
//! It contains the geometry and color types, the in-memory image
//! type, and the decoder for the image format icons are stored in.

/// Basic types used throughout iconify.
pub mod types;
/// In-memory images and scaling.
pub mod pixmap;
/// The XPM image decoder.
pub mod xpm;

pub use pixmap::{Pixmap, PixmapError};
pub use xpm::XpmError;
