//! Type definitions for pointer input as defined
//! by the X server protocol.

use std::convert::TryFrom;

use bitflags::bitflags;

/// A type representing the type of mouse event sent by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// The pointer moved.
    Motion,
    /// A button was pressed.
    Press,
    /// A button was released.
    Release,
}

/// A mouse button, as numbered by the X server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonIndex {
    /// The primary button.
    Left,
    /// The middle button.
    Middle,
    /// The secondary button.
    Right,
    /// Scroll up.
    Button4,
    /// Scroll down.
    Button5,
    /// Any other button, such as horizontal scrolling.
    Other(u8),
}

impl ButtonIndex {
    /// Whether this is the primary button.
    pub fn is_primary(&self) -> bool {
        matches!(self, ButtonIndex::Left)
    }
}

impl TryFrom<u8> for ButtonIndex {
    type Error = u8;

    fn try_from(from: u8) -> Result<ButtonIndex, u8> {
        match from {
            0 => Err(0),
            1 => Ok(ButtonIndex::Left),
            2 => Ok(ButtonIndex::Middle),
            3 => Ok(ButtonIndex::Right),
            4 => Ok(ButtonIndex::Button4),
            5 => Ok(ButtonIndex::Button5),
            n => Ok(ButtonIndex::Other(n)),
        }
    }
}

bitflags! {
    /// Bitmask representing one or a combination of mouse buttons
    /// held down at the time of an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ButtonMask: u16 {
        /// The primary button.
        const M1 = 1 << 8;
        /// The middle button.
        const M2 = 1 << 9;
        /// The secondary button.
        const M3 = 1 << 10;
        #[allow(missing_docs)]
        const M4 = 1 << 11;
        #[allow(missing_docs)]
        const M5 = 1 << 12;
    }
}
