//! Backend-agnostic representations of the X events iconify handles.

use std::convert::TryFrom;

use super::{
    core::{XAtom, XWindowID},
    input::{ButtonIndex, ButtonMask, MouseEventKind},
};
use crate::core::types::Point;

/// Low-level wrapper around actual X server events.
#[derive(Debug, Clone)]
pub enum XEvent {
    /// Part of a window needs to be redrawn.
    Expose(ExposeEvent),
    /// A pointer button was pressed or released, or the pointer moved.
    MouseEvent(MouseEvent),
    /// A client message was received.
    ClientMessage(ClientMessageEvent),
    /// Unknown event type, used as a catchall for events not tracked by iconify.
    Unknown(String),
}

/// Data associated with an exposure event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposeEvent {
    /// The window to redraw.
    pub window: XWindowID,
    /// The number of exposure events still to follow.
    pub count: u16,
}

/// Data associated with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// The window receiving the event.
    pub id: XWindowID,
    /// What happened.
    pub kind: MouseEventKind,
    /// The button pressed or released. Always `None` on motion.
    pub button: Option<ButtonIndex>,
    /// The buttons held down before the event.
    pub mask: ButtonMask,
    /// The pointer position relative to the root window.
    pub root: Point,
    /// The pointer position relative to the receiving window.
    pub rel: Point,
    /// The server timestamp of the event, in milliseconds.
    pub time: u32,
}

/// A ClientMessageEvent sent by the X server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientMessageEvent {
    /// The window receiving the message.
    pub window: XWindowID,
    /// Client message data.
    pub data: ClientMessageData,
    /// The type that the data is to be interpreted as.
    pub type_: XAtom,
}

/// The different formats of a Client message's data,
/// as specified by ICCCM.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ClientMessageData {
    U8([u8; 20]),
    U16([u16; 10]),
    U32([u32; 5]),
}

impl ClientMessageData {
    /// Returns the first data word if the message has 32-bit format.
    pub fn first_u32(&self) -> Option<u32> {
        match self {
            Self::U32(words) => Some(words[0]),
            _ => None,
        }
    }
}

macro_rules! _impl_tryfrom {
    ($t:ty, $count:expr, $variant:expr) => {
        impl TryFrom<&[$t]> for ClientMessageData {
            type Error = std::array::TryFromSliceError;

            fn try_from(data: &[$t]) -> Result<Self, Self::Error> {
                Ok($variant(<[$t; $count]>::try_from(data)?))
            }
        }
    };
}

_impl_tryfrom!(u8, 20, Self::U8);
_impl_tryfrom!(u16, 10, Self::U16);
_impl_tryfrom!(u32, 5, Self::U32);
