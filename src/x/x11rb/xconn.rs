//! Implementation of the XConn trait for X11RBConn.

use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xproto::{self, ConnectionExt as XConnectionExt, EventMask, ImageOrder};

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use tracing::instrument;
use tracing::{error, trace, warn};

use super::{convert::to_xrect, Initialized, X11RBConn};
use crate::core::pixmap::Pixmap;
use crate::core::types::{Color, Point, Rectangle};
use crate::x::{
    core::{
        ClientConfig, Result, TextItem, TreeReply, WindowAttributes, WindowClass, XAtom, XConn,
        XError, XWindow, XWindowID, Xid,
    },
    event::{ClientMessageEvent, XEvent},
    property::Property,
};

macro_rules! icon_event_mask {
    () => {
        EventMask::EXPOSURE
            | EventMask::BUTTON_PRESS
            | EventMask::BUTTON_RELEASE
            | EventMask::POINTER_MOTION
    };
}

macro_rules! root_message_mask {
    () => {
        EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY
    };
}

// put_image request header, plus some slack
const PUT_IMAGE_OVERHEAD: usize = 32;

impl X11RBConn<Initialized> {
    fn set_foreground(&self, color: Color) -> Result<()> {
        self.conn
            .change_gc(*self.gc, &xproto::ChangeGCAux::new().foreground(color.as_u32()))?;
        Ok(())
    }

    // packs a run of rows into ZPixmap data in the server's byte order
    fn pack_rows(&self, image: &Pixmap, rows: std::ops::Range<u32>) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(rows.len() * image.width() as usize * 4);

        let msb = self.conn.setup().image_byte_order == ImageOrder::MSB_FIRST;
        for y in rows {
            for px in image.row(y) {
                if msb {
                    data.write_u32::<BigEndian>(*px)?;
                } else {
                    data.write_u32::<LittleEndian>(*px)?;
                }
            }
        }

        Ok(data)
    }
}

impl XConn for X11RBConn<Initialized> {
    // General X server operations
    #[cfg_attr(
        debug_assertions,
        instrument(target = "xconn", level = "trace", skip(self))
    )]
    fn wait_for_event(&self) -> Result<XEvent> {
        self.conn.flush()?;

        let event = self.conn.wait_for_event()?;
        self.process_raw_event(event)
    }

    fn get_root(&self) -> XWindow {
        self.root
    }

    fn get_geometry(&self, window: XWindowID) -> Result<Rectangle> {
        self.get_geometry_inner(window)
    }

    fn get_window_attributes(&self, window: XWindowID) -> Result<WindowAttributes> {
        trace!("Getting attributes for window {}", window);

        let reply = self.conn.get_window_attributes(*window)?.reply()?;

        Ok(WindowAttributes {
            map_state: reply.map_state.into(),
            override_redirect: reply.override_redirect,
        })
    }

    fn query_tree(&self, window: XWindowID) -> Result<TreeReply> {
        trace!("Querying tree for window {}", window);

        let reply = self.conn.query_tree(*window)?.reply()?;

        Ok(TreeReply {
            root: Xid(reply.root),
            parent: if reply.parent == x11rb::NONE {
                None
            } else {
                Some(Xid(reply.parent))
            },
            children: reply.children.into_iter().map(Xid).collect(),
        })
    }

    fn atom(&self, atom: &str) -> Result<XAtom> {
        if let Some(known) = self.atoms.borrow().retrieve(atom) {
            return Ok(known);
        }
        trace!("Interning atom {}", atom);
        let x = Xid(self.conn.intern_atom(false, atom.as_bytes())?.reply()?.atom);
        trace!("Atom name: {}, atom: {}", atom, x);

        if let Ok(mut atoms) = self.atoms.try_borrow_mut() {
            atoms.insert(atom, x);
        }
        Ok(x)
    }

    fn lookup_atom(&self, atom: XAtom) -> Result<String> {
        trace!("Looking up atom {}", atom);
        if let Some(name) = self.atoms.borrow().retrieve_by_value(atom) {
            trace!("Got name {}", name);
            return Ok(name);
        }
        trace!("Name not known, looking up via X connection");
        let name = String::from_utf8(self.conn.get_atom_name(*atom)?.reply()?.name)?;

        trace!("Got name {}", name);
        if let Ok(mut atoms) = self.atoms.try_borrow_mut() {
            atoms.insert(&name, atom);
        } else {
            warn!("Attempted borrow failed, could not intern atom {}", name);
        }

        Ok(name)
    }

    fn get_property(&self, prop: &str, window: XWindowID) -> Result<Option<Property>> {
        let atom = self.atom(prop)?;
        self.get_prop_atom(atom, window)
    }

    fn set_property(&self, window: XWindowID, prop: &str, data: Property) -> Result<()> {
        use Property::*;

        // replace the property
        let mode = xproto::PropMode::REPLACE;
        // get the name of the property
        let prop = self.atom(prop)?;

        /* (type of property, format (bits), actual data) */
        let (ty, format, data) = match data {
            Atom(atoms) => (
                xproto::AtomEnum::ATOM,
                32,
                atoms
                    .iter()
                    .map(|a| self.atom(a))
                    .collect::<Result<Vec<XAtom>>>()?,
            ),
            Cardinal(card) => (xproto::AtomEnum::CARDINAL, 32, vec![Xid(card)]),
            String(strs) | UTF8String(strs) => {
                let string = strs.join("\0");
                self.conn
                    .change_property(
                        mode,
                        *window,
                        *prop,
                        xproto::AtomEnum::STRING,
                        8, //format
                        string.len() as u32,
                        string.as_bytes(),
                    )?
                    .check()?;
                return Ok(());
            }
            Window(ids) => (xproto::AtomEnum::WINDOW, 32, ids),
            _ => {
                return Err(XError::InvalidPropertyData(
                    "cannot convert non-standard types".into(),
                ))
            }
        };

        let data_len = data.len();

        let mut new_data = Vec::<u8>::with_capacity(data_len * 4);
        for dword in data {
            new_data.write_u32::<LittleEndian>(*dword)?;
        }

        Ok(self
            .conn
            .change_property(mode, *window, *prop, ty, format, data_len as u32, &new_data)?
            .check()?)
    }

    #[cfg_attr(
        debug_assertions,
        instrument(target = "xconn", level = "trace", skip(self))
    )]
    fn create_window(&self, ty: WindowClass, geom: Rectangle) -> Result<XWindowID> {
        use xproto::{CreateWindowAux, WindowClass as XWindowClass};

        let WindowClass::InputOutput(window_type) = ty;

        let screen = self.screen()?;
        let data = CreateWindowAux::new()
            .background_pixel(screen.white_pixel)
            .border_pixel(screen.black_pixel)
            .override_redirect(1 /* true */)
            .event_mask(icon_event_mask!());

        let wid = Xid(self.conn.generate_id()?);
        self.conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            *wid,
            *self.root.id,
            geom.point.x as i16,
            geom.point.y as i16,
            geom.size.width as u16,
            geom.size.height as u16,
            0,
            XWindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &data,
        )?;

        let net_name = crate::x::Atom::NetWmWindowType.as_ref();
        self.set_property(wid, net_name, Property::Atom(vec![window_type.to_string()]))?;

        self.conn.flush()?;

        Ok(wid)
    }

    // Window-related operations
    fn map_window(&self, window: XWindowID) -> Result<()> {
        trace!("Mapping window {}", window);

        let cookie = self.conn.map_window(*window)?.check();
        if let Err(e) = cookie {
            error!("Could not map window {}: {}", window, e);
            Err(e.into())
        } else {
            Ok(())
        }
    }

    fn unmap_window(&self, window: XWindowID) -> Result<()> {
        trace!("Unmapping window {}", window);

        let cookie = self.conn.unmap_window(*window)?.check();
        if let Err(e) = cookie {
            error!("Could not unmap window {}: {}", window, e);
            Err(e.into())
        } else {
            Ok(())
        }
    }

    fn destroy_window(&self, window: XWindowID) -> Result<()> {
        trace!("Destroying window {}", window);
        self.conn.destroy_window(*window)?.check()?;
        Ok(())
    }

    fn configure_window(&self, window: XWindowID, attrs: &[ClientConfig]) -> Result<()> {
        trace!("Configuring window {} with attrs {:?}", window, attrs);
        for attr in attrs {
            let attr2 = attr.into();
            // unchecked, errors arrive as events
            self.conn.configure_window(*window, &attr2)?;
        }
        Ok(())
    }

    fn send_client_message(&self, window: XWindowID, data: ClientMessageEvent) -> Result<()> {
        use crate::x::event::ClientMessageData::*;

        trace!("Sending client message to window {}", window);

        let format = match data.data {
            U8(_) => 8,
            U16(_) => 16,
            U32(_) => 32,
        };

        let mask = if window == self.root.id {
            root_message_mask!()
        } else {
            EventMask::NO_EVENT
        };

        let event = xproto::ClientMessageEvent::new(
            format,
            *data.window,
            *data.type_,
            xproto::ClientMessageData::from(&data.data),
        );

        Ok(self
            .conn
            .send_event(false, *window, mask, event)?
            .check()?)
    }

    fn fill_rectangle(&self, window: XWindowID, rect: Rectangle, color: Color) -> Result<()> {
        self.set_foreground(color)?;
        self.conn
            .poly_fill_rectangle(*window, *self.gc, &[to_xrect(rect)])?;
        Ok(())
    }

    #[cfg_attr(
        debug_assertions,
        instrument(target = "xconn", level = "trace", skip(self, image))
    )]
    fn put_image(&self, window: XWindowID, origin: Point, image: &Pixmap) -> Result<()> {
        let depth = self.screen()?.root_depth;
        let bpp = self
            .conn
            .setup()
            .pixmap_formats
            .iter()
            .find(|f| f.depth == depth)
            .map(|f| f.bits_per_pixel)
            .ok_or(XError::RequestError("no pixmap format for the root depth"))?;

        if bpp != 32 {
            return Err(XError::RequestError("only 32 bits per pixel images are supported"));
        }

        // split the image so that each request fits
        let stride = image.width() as usize * 4;
        let max_bytes = self.conn.maximum_request_bytes();
        let rows_per_req = (max_bytes.saturating_sub(PUT_IMAGE_OVERHEAD) / stride).max(1) as u32;

        let mut y = 0;
        while y < image.height() {
            let end = (y + rows_per_req).min(image.height());
            let data = self.pack_rows(image, y..end)?;

            self.conn.put_image(
                xproto::ImageFormat::Z_PIXMAP,
                *window,
                *self.gc,
                image.width() as u16,
                (end - y) as u16,
                origin.x as i16,
                (origin.y + y as i32) as i16,
                0,
                depth,
                &data,
            )?;

            y = end;
        }

        Ok(())
    }

    fn draw_text(&self, window: XWindowID, text: TextItem<'_>, color: Color) -> Result<()> {
        self.set_foreground(color)?;

        // latin-1, which is what core fonts speak
        let bytes: Vec<u8> = text
            .text
            .chars()
            .map(|c| if (c as u32) < 0x100 { c as u8 } else { b'?' })
            .collect();

        // a TEXTITEM8 holds at most 254 characters
        let mut items = Vec::with_capacity(bytes.len() + 2);
        for chunk in bytes.chunks(254) {
            items.push(chunk.len() as u8);
            items.push(0); // delta
            items.extend_from_slice(chunk);
        }

        self.conn.poly_text8(
            *window,
            *self.gc,
            text.origin.x as i16,
            text.origin.y as i16,
            &items,
        )?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(self.conn.flush()?)
    }
}
