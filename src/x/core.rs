//! Core types for interfacing with the X server.
//!
//! This module defines the identifiers, window descriptions and the
//! error type shared by every [`XConn`] implementation.

use core::ops::Deref;
use std::fmt::{self, Display};

use thiserror::Error;

use super::atom::Atom;
use crate::core::types::{Point, Rectangle};

#[doc(inline)]
pub use super::traits::XConn;

//* ========== X WINDOW THINGS ========== *//

/// General constant for expressing None when passing X IDs.
pub const XID_NONE: Xid = Xid::zero();

/// Wrapper type to represent IDs used by the X server.
///
/// This is used by the server to identify all sorts
/// of X resources, including windows and atoms.
///
/// ```rust
/// use iconify::x::Xid;
///
/// let id = Xid::from(0x1a00007);
/// assert_eq!(id.val(), 0x1a00007);
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash, Default)]
pub struct Xid(pub(crate) u32);

impl Xid {
    /// Return an Xid set to 0.
    pub const fn zero() -> Self {
        Xid(0)
    }

    /// Returns the internal value of the Xid.
    pub const fn val(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Xid {
    fn from(f: u32) -> Xid {
        Xid(f)
    }
}

impl Display for Xid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl Deref for Xid {
    type Target = u32;

    fn deref(&self) -> &u32 {
        &self.0
    }
}

/// An X server ID for a given window.
pub type XWindowID = Xid;

/// An X Atom.
pub type XAtom = Xid;

/// Representation of an X window with its geometry.
#[derive(Debug, Clone, Copy)]
pub struct XWindow {
    /// The X ID assigned to the window.
    pub id: XWindowID,
    /// The geometry of the window as stored on the X server.
    pub geom: Rectangle,
}

impl XWindow {
    /// Creates an `XWindow` with all fields zeroed.
    pub fn zeroed() -> Self {
        XWindow {
            id: Xid(0),
            geom: Rectangle::zeroed(),
        }
    }

    /// Creates an `XWindow` with the given data.
    pub fn with_data(id: XWindowID, geom: Rectangle) -> Self {
        XWindow { id, geom }
    }
}

impl PartialEq for XWindow {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl From<XWindowID> for XWindow {
    fn from(from: XWindowID) -> Self {
        Self {
            id: from,
            geom: Rectangle::zeroed(),
        }
    }
}

/// Whether a window is mapped, and if so, whether it can be seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapState {
    /// The window is not mapped.
    Unmapped,
    /// The window is mapped but an ancestor is not.
    Unviewable,
    /// The window and all its ancestors are mapped.
    Viewable,
}

/// The subset of a window's attributes this crate cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAttributes {
    /// The map state of the window.
    pub map_state: MapState,
    /// Whether the window bypasses the window manager.
    pub override_redirect: bool,
}

impl WindowAttributes {
    /// Whether the window is currently visible on screen.
    pub fn is_viewable(&self) -> bool {
        self.map_state == MapState::Viewable
    }
}

/// The reply to a tree query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeReply {
    /// The root window of the screen the window is on.
    pub root: XWindowID,
    /// The window's parent, or `None` if the window is a root window.
    pub parent: Option<XWindowID>,
    /// The window's children, in stacking order from bottom to top.
    pub children: Vec<XWindowID>,
}

/// Window stacking modes defined by the X Protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackMode {
    /// Stack the window at the top of the stack.
    Above,
    /// Stack the window at the bottom of the stack.
    Below,
}

/// Configuration options for a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientConfig {
    /// Moving the window.
    #[allow(missing_docs)]
    Move { x: i32, y: i32 },
    /// Stacking mode of the window.
    StackingMode(StackMode),
}

/// The type of window that you want to create.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowClass {
    /// A regular window that accepts input and can be drawn on.
    /// The Atom provided should be a valid `_NET_WM_WINDOW_TYPE`.
    ///
    /// The window is created override-redirect, with a white background
    /// and no X border, and selects exposure, button and pointer
    /// motion events.
    InputOutput(Atom),
}

/// A description of text to be drawn onto a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextItem<'a> {
    /// The text itself.
    pub text: &'a str,
    /// The position of the left end of the baseline.
    pub origin: Point,
}

/// Possible errors returned by the X connection.
#[non_exhaustive]
#[derive(Debug, Error, Clone)]
pub enum XError {
    /// An error when establishing a connection with the server.
    #[error("X connection error: {0}")]
    Connection(String),

    /// An error caused by a malformed protocol request.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// No screens were found on the X server.
    #[error("Could not find screens from X server")]
    NoScreens,

    /// An invalid screen was selected.
    #[error("Unknown screen selected")]
    InvalidScreen,

    /// An internal server error.
    #[error("X server error: {0}")]
    ServerError(String),

    /// An error converting property or client message data.
    #[error("Error converting client message data")]
    ConversionError,

    /// A request for window properties returned malformed data.
    #[error("Invalid property data: {0}")]
    InvalidPropertyData(String),

    /// The request could not be fulfilled by the X server.
    #[error("Could not complete specified request: {0}")]
    RequestError(&'static str),

    /// The window does not exist.
    #[error("No such window {0}")]
    UnknownWindow(XWindowID),

    /// Some error not tracked by iconify.
    #[error("{0}")]
    OtherError(String),
}

/// Result type for XConn.
pub type Result<T> = ::core::result::Result<T, XError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_xid_display() {
        let id = Xid::from(0x1a00007);
        assert_eq!(id.to_string(), "0x1a00007");
        assert_eq!(*id, 0x1a00007);
        assert_eq!(XID_NONE.val(), 0);
    }

    #[test]
    fn test_window_viewable() {
        let attrs = WindowAttributes {
            map_state: MapState::Unviewable,
            override_redirect: false,
        };
        assert!(!attrs.is_viewable());
    }
}
