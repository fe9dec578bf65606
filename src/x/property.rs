//! Window properties as stored on the X server.

use super::core::XWindowID;

/// Data for a property on a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    /// a list of Atoms (u32), expressed as strings.
    Atom(Vec<String>),

    /// a cardinal number.
    Cardinal(u32),

    /// a list of strings.
    String(Vec<String>),

    /// a list of UTF-8 encoded strings.
    UTF8String(Vec<String>),

    /// a list of windows IDs.
    Window(Vec<XWindowID>),

    /// Raw data as a vec of bytes, along with the name of its type.
    /// Returned if the format of the response is 8.
    U8List(String, Vec<u8>),

    /// Raw data as a vec of words, along with the name of its type.
    /// Returned if the format of the response is 16.
    U16List(String, Vec<u16>),

    /// Raw data as a vec of doublewords, along with the name of its type.
    /// Returned if the format of the response is 32.
    U32List(String, Vec<u32>),
}

impl Property {
    /// Returns the strings held by a string-typed property.
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            Property::String(strs) | Property::UTF8String(strs) => Some(strs),
            _ => None,
        }
    }
}

/// ICCCM-defined window states.
///
/// Only the state iconify asks a window manager for is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum WindowState {
    /// The window is iconified.
    Iconic = 3,
}
