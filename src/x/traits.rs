//! The trait that defines the interface to the X Server.

use tracing::{debug, trace};

use super::{
    atom::Atom,
    core::{ClientConfig, Result, TextItem, WindowAttributes, WindowClass},
    core::{TreeReply, XAtom, XWindow, XWindowID},
    event::{ClientMessageData, ClientMessageEvent, XEvent},
    property::{Property, WindowState},
};
use crate::core::pixmap::Pixmap;
use crate::core::types::{Color, Point, Rectangle};

/// A trait used to define the interface between iconify and the X server.
///
/// XConn provides an abstraction layer for talking to an underlying X server.
/// Its methods are designed to provide as thin a layer as possible,
/// often mapping directly to X server protocol requests, with type
/// conversion to present dependency-agnostic types.
///
/// # Implementors
///
/// This crate provides [X11RBConn][1], backed by x11rb, and an in-memory
/// connection used by its own tests.
///
/// # Atom Management
///
/// An XConn implementation should also provide a way to manage X atoms.
/// Its `atom()` method should intern an Atom if not known, and
/// the implementation should store this in its internal state in some way.
///
/// [1]: crate::x::x11rb::X11RBConn
pub trait XConn {
    //* General X server operations

    /// Blocks until the next event arrives from the X server.
    ///
    /// Any requests still buffered are flushed before waiting.
    fn wait_for_event(&self) -> Result<XEvent>;

    /// Returns the ID and geometry of the root window.
    fn get_root(&self) -> XWindow;

    /// Returns the geometry of a given window, relative to its parent.
    fn get_geometry(&self, window: XWindowID) -> Result<Rectangle>;

    /// Returns the map state and override-redirect flag of a window.
    fn get_window_attributes(&self, window: XWindowID) -> Result<WindowAttributes>;

    /// Queries the parent and children of the given window.
    fn query_tree(&self, window: XWindowID) -> Result<TreeReply>;

    /// Get the value of an atom by its name.
    ///
    /// You can use [Atom]'s `as_ref()` method to get a
    /// known atom's string representation.
    ///
    /// If the atom is unknown, intern it.
    fn atom(&self, atom: &str) -> Result<XAtom>;

    /// Looks up the name of an atom.
    fn lookup_atom(&self, atom: XAtom) -> Result<String>;

    /// Retrieves a given property for a given window by its atom name.
    fn get_property(&self, prop: &str, window: XWindowID) -> Result<Option<Property>>;

    /// Set the property for a given window, replacing the previous value.
    fn set_property(&self, window: XWindowID, prop: &str, data: Property) -> Result<()>;

    //* Window-related operations

    /// Creates a new top-level window with the given geometry.
    fn create_window(&self, ty: WindowClass, geom: Rectangle) -> Result<XWindowID>;

    /// Maps a given window.
    fn map_window(&self, window: XWindowID) -> Result<()>;

    /// Unmaps a given window.
    fn unmap_window(&self, window: XWindowID) -> Result<()>;

    /// Destroys a window.
    fn destroy_window(&self, window: XWindowID) -> Result<()>;

    /// Configure a given window.
    fn configure_window(&self, window: XWindowID, attrs: &[ClientConfig]) -> Result<()>;

    /// Sends a client message to the given window.
    ///
    /// Messages sent to the root window are delivered to whoever
    /// selected substructure redirection on it, usually the window
    /// manager. Messages to any other window go to its owner.
    fn send_client_message(&self, window: XWindowID, data: ClientMessageEvent) -> Result<()>;

    //* Drawing operations

    /// Fills a rectangle of a window with a solid color.
    fn fill_rectangle(&self, window: XWindowID, rect: Rectangle, color: Color) -> Result<()>;

    /// Uploads an image onto a window with its top-left corner at `origin`.
    fn put_image(&self, window: XWindowID, origin: Point, image: &Pixmap) -> Result<()>;

    /// Draws a line of text onto a window.
    fn draw_text(&self, window: XWindowID, text: TextItem<'_>, color: Color) -> Result<()>;

    /// Sends all buffered requests to the server.
    fn flush(&self) -> Result<()>;

    //* PROVIDED METHODS *//

    // ICCCM-related operations

    /// Gets WM_CLASS as an `(instance, class)` pair.
    ///
    /// Returns None if not set, malformed, or in case of error.
    fn get_wm_class(&self, window: XWindowID) -> Option<(String, String)> {
        let prop = self
            .get_property(Atom::WmClass.as_ref(), window)
            .unwrap_or(None);

        match prop.as_ref().and_then(Property::as_strings) {
            Some([instance, class, ..]) => Some((instance.to_owned(), class.to_owned())),
            Some([instance]) => Some((instance.to_owned(), String::new())),
            _ => {
                debug!(target: "get_wm_class", "expected strings, got: {:?}", prop);
                None
            }
        }
    }

    /// Sets `WM_NAME` and `WM_ICON_NAME`.
    fn set_wm_names(&self, window: XWindowID, name: &str, icon_name: &str) -> Result<()> {
        self.set_property(
            window,
            Atom::WmName.as_ref(),
            Property::String(vec![name.into()]),
        )?;
        self.set_property(
            window,
            Atom::WmIconName.as_ref(),
            Property::String(vec![icon_name.into()]),
        )
    }

    /// Sets `WM_PROTOCOLS` to the given protocols.
    fn set_wm_protocols(&self, window: XWindowID, protocols: &[Atom]) -> Result<()> {
        self.set_property(
            window,
            Atom::WmProtocols.as_ref(),
            Property::Atom(protocols.iter().map(|a| a.to_string()).collect()),
        )
    }

    /// Asks the window manager to iconify a window, as described in
    /// ICCCM §4.1.4.
    fn iconify_window(&self, window: XWindowID) -> Result<()> {
        trace!("requesting iconic state for {}", window);

        let event = ClientMessageEvent {
            window,
            data: ClientMessageData::U32([WindowState::Iconic as u32, 0, 0, 0, 0]),
            type_: self.atom(Atom::WmChangeState.as_ref())?,
        };

        self.send_client_message(self.get_root().id, event)
    }

    // EWMH-related operations

    /// Sets `_NET_WM_STATE` to the given atoms on the selected window.
    fn set_wm_state(&self, window: XWindowID, atoms: &[Atom]) -> Result<()> {
        self.set_property(
            window,
            Atom::NetWmState.as_ref(),
            Property::Atom(atoms.iter().map(|a| a.to_string()).collect()),
        )
    }
}
