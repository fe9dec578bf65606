//! # Iconify - minimize a window to a desktop icon
//!
//! Iconify takes an X11 window and puts a small icon on the desktop in its
//! place, in the spirit of the icons of TWM and other early window managers.
//! The icon shows a picture of the application and an optional caption, can
//! be dragged around with the primary mouse button, and brings the window
//! back when double-clicked.
//!
//! It does not need a window manager to work, and it does not replace one:
//! every icon is its own small program that handles exactly one window and
//! exits when the icon is dismissed.
//!
//! ## Structure
//!
//! - [`x`] is the interface to the X server, the [`XConn`](x::XConn) trait,
//!   and its implementation on top of `x11rb`.
//! - [`core`] holds geometry and color types, the [`Pixmap`](core::Pixmap)
//!   image type with its scaler, and the XPM decoder.
//! - [`config`] describes how an icon looks and behaves.
//! - [`icon`] is the icon itself: placing it, drawing it, and handling input.
//! - [`cli`] is the command line of the `iconify` binary.
//!
//! ## Example
//!
//! ```no_run
//! use iconify::config::IconConfig;
//! use iconify::icon::{load_icon, IconState};
//! use iconify::x::{X11RBConn, Xid};
//!
//! # fn main() -> iconify::Result<()> {
//! let conn = X11RBConn::new()?;
//! let config = IconConfig::new();
//! let window = Xid::from(0x1a00007);
//!
//! let source = load_icon(&conn, None, window, &config)?;
//! let mut icon = IconState::new(&conn, window, source, None, None, config)?;
//! icon.create()?;
//! icon.run()?;
//! icon.destroy()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_debug_implementations, missing_docs)]

pub mod cli;
pub mod config;
pub mod core;
pub mod icon;
pub mod x;

pub use crate::core::types;
#[doc(inline)]
pub use crate::config::IconConfig;
#[doc(inline)]
pub use crate::icon::{Dismissal, IconState};

use std::io;

use thiserror::Error;

use crate::core::{PixmapError, XpmError};
use crate::x::{XError, XWindowID};

/// Everything that could possibly go wrong while an icon is up.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum IconError {
    /// An error with the underlying X connection.
    #[error("X error: {0}")]
    Platform(#[from] XError),

    /// The configuration is not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An image could not be built or scaled.
    #[error("image error: {0}")]
    Pixmap(#[from] PixmapError),

    /// An icon file could not be decoded.
    #[error("could not decode icon: {0}")]
    Image(#[from] XpmError),

    /// An IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// None of the icon candidates could be loaded.
    #[error("no usable icon found")]
    NoIcon,

    /// The window to iconify could not be queried.
    #[error("cannot query window {0}: {1}")]
    TargetWindow(XWindowID, XError),

    /// The icon window already exists.
    #[error("icon window already created")]
    AlreadyCreated,

    /// The icon window has not been created yet.
    #[error("icon window not created")]
    NotCreated,
}

/// Result type for iconify.
pub type Result<T> = ::core::result::Result<T, IconError>;
