use core::marker::PhantomData;

use std::cell::RefCell;
use std::convert::TryFrom;
use std::fmt;

use tracing::{debug, trace, warn};

use x11rb::connection::Connection;
use x11rb::protocol::{
    xproto::{self, ConnectionExt as XConnectionExt, CreateGCAux, Screen},
    Event,
};
use x11rb::rust_connection::RustConnection;

use strum::*;

use super::{
    atom::Atom,
    core::{Result, XAtom, XError, XWindow, XWindowID, Xid},
    event::{ClientMessageData, ClientMessageEvent, ExposeEvent, XEvent},
    property::Property,
    traits::XConn,
    Atoms, ConnStatus, Initialized, Uninitialized,
};
use crate::core::types::Rectangle;

mod convert;
mod xconn;

// the most property data we ask for, in 32-bit units
const MAX_LONG_LENGTH: u32 = 1024;

// caption font
const CAPTION_FONT: &str = "fixed";

/// A connection to an X server, backed by the x11rb library.
///
/// This is a very simple connection to the X server
/// and is completely synchronous, despite the async capabilities
/// of the underlying library.
///
/// # Usage
///
/// ```no_run
/// use iconify::x::x11rb::X11RBConn;
///
/// let conn = X11RBConn::connect().expect("Connection error");
/// let conn = conn.init().expect("Could not initialize");
///
/// /* or: */
/// let conn = X11RBConn::new().expect("Connection error");
/// ```
pub struct X11RBConn<S: ConnStatus> {
    conn: RustConnection,
    root: XWindow,
    idx: usize,
    atoms: RefCell<Atoms>, // wrap in RefCell for interior mutability
    gc: Xid,
    _marker: PhantomData<S>,
}

impl X11RBConn<Uninitialized> {
    /// Connect to the X server and allocate a new Connection.
    pub fn connect() -> Result<Self> {
        let (conn, idx) = x11rb::connect(None)?;
        debug!("Connected to x server, got preferred screen {}", idx);

        Ok(Self {
            conn,
            root: XWindow::zeroed(),
            idx,
            atoms: RefCell::new(Atoms::new()),
            gc: Xid(0),
            _marker: PhantomData,
        })
    }

    /// Initializes the connection.
    ///
    /// It does the following:
    ///
    /// - Initializes the root window and its dimensions.
    /// - Interns all known [atoms][1].
    /// - Creates the graphics context used for drawing, with the
    ///   caption font loaded.
    ///
    /// [1]: crate::x::atom::Atom
    #[must_use = "this consumes the connection and returns an initialized one"]
    pub fn init(mut self) -> Result<X11RBConn<Initialized>> {
        // get root window id
        let root = match self.conn.setup().roots.get(self.idx) {
            Some(screen) => {
                let id = Xid(screen.root);
                let geom = self.get_geometry_inner(id)?;
                XWindow::with_data(id, geom)
            }
            None => return Err(XError::NoScreens),
        };
        debug!("Got root: {:?}", root);

        let atomcount = Atom::iter().count();
        let mut atomvec = Vec::with_capacity(atomcount);

        // intern all known atoms

        // get cookies for all first
        for atom in Atom::iter() {
            atomvec.push((
                atom.to_string(),
                self.conn.intern_atom(false, atom.as_ref().as_bytes())?,
            ));
        }

        let atoms = self.atoms.get_mut();

        // then get replies
        for (name, cookie) in atomvec {
            atoms.insert(&name, Xid(cookie.reply()?.atom));
        }

        let gc = self.create_gc_inner(root.id)?;

        Ok(X11RBConn {
            conn: self.conn,
            root,
            idx: self.idx,
            atoms: self.atoms,
            gc,
            _marker: PhantomData,
        })
    }
}

impl<S: ConnStatus> X11RBConn<S> {
    #[inline]
    pub(crate) fn get_geometry_inner(&self, window: XWindowID) -> Result<Rectangle> {
        trace!("Getting geometry for window {}", window);

        // send the request and grab its reply
        Ok(self
            .conn
            .get_geometry(*window)?
            .reply()
            .map(|ok| Rectangle::new(ok.x as i32, ok.y as i32, ok.width as u32, ok.height as u32))?)
    }

    pub(crate) fn create_gc_inner(&self, root: XWindowID) -> Result<Xid> {
        trace!("creating graphics context");

        let mut aux = CreateGCAux::new().graphics_exposures(0);

        let fid = self.conn.generate_id()?;
        match self.conn.open_font(fid, CAPTION_FONT.as_bytes())?.check() {
            Ok(()) => aux = aux.font(fid),
            Err(e) => warn!("could not open font {}, using the default: {}", CAPTION_FONT, e),
        }

        let gc = Xid(self.conn.generate_id()?);
        self.conn.create_gc(*gc, *root, &aux)?.check()?;

        Ok(gc)
    }
}

impl X11RBConn<Initialized> {
    /// Shortcut static method for directly creating
    /// an initialized connection.
    pub fn new() -> Result<Self> {
        X11RBConn::connect()?.init()
    }

    /// Exposes `X11RBConn`'s internal connection.
    pub fn conn(&self) -> &RustConnection {
        &self.conn
    }

    pub(crate) fn screen(&self) -> Result<&Screen> {
        self.conn
            .setup()
            .roots
            .get(self.idx)
            .ok_or(XError::InvalidScreen)
    }

    fn process_raw_event(&self, event: Event) -> Result<XEvent> {
        match event {
            Event::Expose(event) => Ok(XEvent::Expose(ExposeEvent {
                window: Xid(event.window),
                count: event.count,
            })),
            Event::ButtonPress(event) => Ok(XEvent::MouseEvent(self.do_mouse_press(event, false)?)),
            Event::ButtonRelease(event) => {
                Ok(XEvent::MouseEvent(self.do_mouse_press(event, true)?))
            }
            Event::MotionNotify(event) => Ok(XEvent::MouseEvent(self.do_mouse_motion(event))),
            Event::ClientMessage(event) => Ok(XEvent::ClientMessage(ClientMessageEvent {
                window: Xid(event.window),
                data: ClientMessageData::try_from(&event)?,
                type_: Xid(event.type_),
            })),
            unk => Ok(XEvent::Unknown(format!("{:?}", unk))),
        }
    }

    fn get_prop_atom(&self, prop: XAtom, window: XWindowID) -> Result<Option<Property>> {
        let r = self
            .conn
            .get_property(
                false,
                *window,
                *prop,
                xproto::AtomEnum::ANY,
                // start at offset 0
                0,
                // allow for up to 4 * MAX_LONG_LENGTH bytes of information
                MAX_LONG_LENGTH,
            )?
            .reply()?;

        if r.type_ == x11rb::NONE {
            trace!("prop type is none");
            return Ok(None);
        }

        let prop_type = self.lookup_atom(Xid(r.type_))?;
        trace!("got prop_type {}", prop_type);

        let split = |s: &str| -> Vec<String> {
            s.trim_matches('\0').split('\0').map(|a| a.to_string()).collect()
        };

        Ok(match prop_type.as_str() {
            "ATOM" => Some(Property::Atom(convert::atom_names(
                r.value32().ok_or(XError::ConversionError)?,
                |a| self.lookup_atom(a),
            )?)),
            "CARDINAL" => Some(Property::Cardinal(
                r.value32()
                    .and_then(|mut v| v.next())
                    .ok_or(XError::ConversionError)?,
            )),
            "STRING" => Some(Property::String(split(&String::from_utf8_lossy(&r.value)))),
            "UTF8_STRING" => Some(Property::UTF8String(split(&String::from_utf8(r.value)?))),
            "WINDOW" => Some(Property::Window(
                r.value32().ok_or(XError::ConversionError)?.map(Xid).collect(),
            )),
            n => match r.format {
                8 => Some(Property::U8List(n.into(), r.value)),
                16 => Some(Property::U16List(
                    n.into(),
                    r.value16().ok_or(XError::ConversionError)?.collect(),
                )),
                32 => Some(Property::U32List(
                    n.into(),
                    r.value32().ok_or(XError::ConversionError)?.collect(),
                )),
                n => {
                    return Err(XError::InvalidPropertyData(format!(
                        "received format {}",
                        n
                    )))
                }
            },
        })
    }
}

impl<S: ConnStatus> fmt::Debug for X11RBConn<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("X11RBConn")
            .field("root", &self.root)
            .field("idx", &self.idx)
            .field("gc", &self.gc)
            .finish()
    }
}

use std::io::Error;

impl From<Error> for XError {
    fn from(e: Error) -> XError {
        XError::OtherError(e.to_string())
    }
}

use x11rb::errors;

impl From<errors::ConnectionError> for XError {
    fn from(e: errors::ConnectionError) -> XError {
        use errors::ConnectionError::*;
        match e {
            UnknownError | InsufficientMemory | FdPassingFailed => {
                XError::Connection(e.to_string())
            }
            IoError(e) => XError::Connection(e.to_string()),
            other => XError::Protocol(other.to_string()),
        }
    }
}

impl From<errors::ConnectError> for XError {
    fn from(e: errors::ConnectError) -> XError {
        XError::Connection(e.to_string())
    }
}

impl From<errors::ReplyError> for XError {
    fn from(e: errors::ReplyError) -> XError {
        match e {
            errors::ReplyError::ConnectionError(e) => e.into(),
            other => XError::ServerError(other.to_string()),
        }
    }
}

impl From<errors::ReplyOrIdError> for XError {
    fn from(e: errors::ReplyOrIdError) -> XError {
        match e {
            errors::ReplyOrIdError::ConnectionError(e) => e.into(),
            other => XError::ServerError(other.to_string()),
        }
    }
}
