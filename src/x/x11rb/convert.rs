//! Conversions between iconify and x11rb types.

use std::convert::TryFrom;

use x11rb::protocol::xproto::{self, ConfigureWindowAux};

use super::{Initialized, X11RBConn};
use crate::core::types::{Point, Rectangle};
use crate::x::{
    core::{ClientConfig, MapState, Result, StackMode, XAtom, XError, Xid},
    event::{ClientMessageData, MouseEvent},
    input::{ButtonIndex, ButtonMask, MouseEventKind},
};

//* button mask conversions
#[doc(hidden)]
impl From<xproto::KeyButMask> for ButtonMask {
    fn from(from: xproto::KeyButMask) -> ButtonMask {
        ButtonMask::from_bits_truncate(u16::from(from))
    }
}

#[doc(hidden)]
impl From<xproto::MapState> for MapState {
    fn from(from: xproto::MapState) -> MapState {
        match from {
            xproto::MapState::VIEWABLE => MapState::Viewable,
            xproto::MapState::UNVIEWABLE => MapState::Unviewable,
            _ => MapState::Unmapped,
        }
    }
}

impl TryFrom<&xproto::ClientMessageEvent> for ClientMessageData {
    type Error = XError;

    fn try_from(event: &xproto::ClientMessageEvent) -> Result<Self> {
        match event.format {
            8 => Ok(Self::U8(event.data.as_data8())),
            16 => Ok(Self::U16(event.data.as_data16())),
            32 => Ok(Self::U32(event.data.as_data32())),
            _ => Err(XError::ConversionError),
        }
    }
}

impl From<&ClientMessageData> for xproto::ClientMessageData {
    fn from(from: &ClientMessageData) -> Self {
        match *from {
            ClientMessageData::U8(bytes) => bytes.into(),
            ClientMessageData::U16(words) => words.into(),
            ClientMessageData::U32(dwords) => dwords.into(),
        }
    }
}

// the protocol caps coordinates at 16 bits
pub(super) fn to_xrect(rect: Rectangle) -> xproto::Rectangle {
    xproto::Rectangle {
        x: rect.point.x as i16,
        y: rect.point.y as i16,
        width: rect.size.width.min(u16::MAX as u32) as u16,
        height: rect.size.height.min(u16::MAX as u32) as u16,
    }
}

// names for the atoms in an ATOM property, failing if any is unknown
pub(super) fn atom_names<I, F>(atoms: I, lookup: F) -> Result<Vec<String>>
where
    I: IntoIterator<Item = u32>,
    F: Fn(XAtom) -> Result<String>,
{
    atoms.into_iter().map(|a| lookup(Xid(a))).collect()
}

impl X11RBConn<Initialized> {
    /// Converts button events into mouse events.
    pub(super) fn do_mouse_press(
        &self,
        ev: xproto::ButtonPressEvent,
        rel: bool,
    ) -> Result<MouseEvent> {
        let button = ButtonIndex::try_from(ev.detail).map_err(|_| XError::ConversionError)?;

        let kind = if !rel {
            MouseEventKind::Press
        } else {
            MouseEventKind::Release
        };

        Ok(MouseEvent {
            id: Xid(ev.event),
            kind,
            button: Some(button),
            mask: ButtonMask::from(ev.state),
            root: Point::new(ev.root_x as i32, ev.root_y as i32),
            rel: Point::new(ev.event_x as i32, ev.event_y as i32),
            time: ev.time,
        })
    }

    pub(super) fn do_mouse_motion(&self, ev: xproto::MotionNotifyEvent) -> MouseEvent {
        MouseEvent {
            id: Xid(ev.event),
            kind: MouseEventKind::Motion,
            button: None,
            mask: ButtonMask::from(ev.state),
            root: Point::new(ev.root_x as i32, ev.root_y as i32),
            rel: Point::new(ev.event_x as i32, ev.event_y as i32),
            time: ev.time,
        }
    }
}

// converting ClientConfigs into x11rb's request aux
impl From<&ClientConfig> for ConfigureWindowAux {
    fn from(from: &ClientConfig) -> ConfigureWindowAux {
        use ClientConfig::*;

        match from {
            Move { x, y } => ConfigureWindowAux::new().x(*x).y(*y),
            StackingMode(StackMode::Above) => {
                ConfigureWindowAux::new().stack_mode(xproto::StackMode::ABOVE)
            }
            StackingMode(StackMode::Below) => {
                ConfigureWindowAux::new().stack_mode(xproto::StackMode::BELOW)
            }
        }
    }
}
