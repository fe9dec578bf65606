//! The icon itself.
//!
//! An [`IconState`] stands in for one iconified window. Its lifetime
//! runs through four steps, each of which happens once:
//!
//! 1. [`IconState::new`] checks the configuration and works out the
//!    caption.
//! 2. [`IconState::create`] finds where the original window is, puts
//!    an icon window there, and asks the window manager to iconify the
//!    original.
//! 3. [`IconState::run`] handles input on the icon until the user
//!    double-clicks it or something asks it to close.
//! 4. [`IconState::destroy`] gets rid of the icon window.
//!
//! The connection to the X server is borrowed for the whole lifetime
//! and is never closed here.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, trace, warn};

use crate::config::IconConfig;
use crate::core::pixmap::Pixmap;
use crate::core::types::{Point, Rectangle};
use crate::x::{
    core::{ClientConfig, StackMode, WindowClass},
    Atom, XConn, XWindowID,
};
use crate::{IconError, Result};

mod draw;
pub mod interact;
pub mod loader;
pub mod resolve;

#[doc(inline)]
pub use interact::{DragState, IconAction, Interaction};
#[doc(inline)]
pub use loader::load_icon;
#[doc(inline)]
pub use resolve::{place, resolve_origin, ResolveError};

/// The longest caption kept, in characters.
pub const MAX_NAME_CHARS: usize = 99;
/// The caption used when no name can be found.
pub const UNKNOWN_NAME: &str = "Unknown";

/// How the icon went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    /// The user double-clicked the icon and the original window is back.
    Restored,
    /// The icon was asked to close. The original window stays iconified.
    Closed,
}

/// An iconified window and the icon standing in for it.
pub struct IconState<'a, X: XConn> {
    conn: &'a X,
    original: XWindowID,
    icon: Option<XWindowID>,
    source: Pixmap,
    name: String,
    path: Option<PathBuf>,
    position: Point,
    config: IconConfig,
}

impl<'a, X: XConn> IconState<'a, X> {
    /// Sets up an icon for `original`, without touching the screen.
    ///
    /// The caption is `name` if given, or else the instance part of the
    /// window's `WM_CLASS`, or else [`UNKNOWN_NAME`], and is cut down to
    /// [`MAX_NAME_CHARS`] characters. `path` is where `source` was
    /// loaded from, if anywhere.
    pub fn new(
        conn: &'a X,
        original: XWindowID,
        source: Pixmap,
        name: Option<String>,
        path: Option<PathBuf>,
        config: IconConfig,
    ) -> Result<Self> {
        config.validate()?;

        let name = name
            .filter(|n| !n.is_empty())
            .or_else(|| {
                conn.get_wm_class(original)
                    .map(|(instance, _)| instance)
                    .filter(|i| !i.is_empty())
            })
            .unwrap_or_else(|| UNKNOWN_NAME.into());
        let name: String = name.chars().take(MAX_NAME_CHARS).collect();

        debug!(
            "icon for {} will be called {:?}, artwork from {:?}",
            original, name, path
        );

        Ok(Self {
            conn,
            original,
            icon: None,
            source,
            name,
            path,
            position: config.fallback(),
            config,
        })
    }

    /// Shows the icon and iconifies the original window.
    ///
    /// If the original window cannot be queried, nothing is created and
    /// [`IconError::TargetWindow`] is returned.
    pub fn create(&mut self) -> Result<()> {
        if self.icon.is_some() {
            return Err(IconError::AlreadyCreated);
        }

        let position = place(self.conn, self.original, self.config.fallback()).map_err(|e| {
            error!("cannot iconify {}: {}", self.original, e);
            IconError::TargetWindow(self.original, e.source)
        })?;
        self.position = position;

        let geom = Rectangle::from_parts(position, self.config.window_size());
        let icon = self.conn.create_window(
            WindowClass::InputOutput(Atom::NetWindowTypeDesktop),
            geom,
        )?;
        self.icon = Some(icon);
        debug!("created icon window {} at {}", icon, position);

        self.conn.set_wm_state(icon, &[Atom::NetWmStateBelow])?;
        self.conn.set_wm_names(icon, &self.name, &self.name)?;
        self.conn.set_wm_protocols(icon, &[Atom::WmDeleteWindow])?;

        self.draw()?;
        self.conn.map_window(icon)?;
        self.conn
            .configure_window(icon, &[ClientConfig::StackingMode(StackMode::Below)])?;

        self.conn.iconify_window(self.original)?;
        self.conn.flush()?;

        info!("iconified {} as {:?}", self.original, self.name);
        Ok(())
    }

    /// Handles input on the icon until it is dismissed.
    ///
    /// Blocks waiting for events. Returns how the icon was dismissed,
    /// or an error if the connection fails.
    pub fn run(&mut self) -> Result<Dismissal> {
        let icon = self.icon.ok_or(IconError::NotCreated)?;
        let close = self.conn.atom(Atom::WmDeleteWindow.as_ref())?;
        let mut interaction = Interaction::new(&self.config, close);

        loop {
            let event = self.conn.wait_for_event()?;
            trace!("got event {:?}", event);

            match interaction.handle(&event) {
                Some(IconAction::Move(to)) => {
                    self.conn
                        .configure_window(icon, &[ClientConfig::Move { x: to.x, y: to.y }])?;
                    self.position = to;
                }
                Some(IconAction::Redraw) => self.draw()?,
                Some(IconAction::Restore) => {
                    self.restore()?;
                    return Ok(Dismissal::Restored);
                }
                Some(IconAction::Close) => {
                    info!("icon for {} closed", self.original);
                    return Ok(Dismissal::Closed);
                }
                None => {}
            }
        }
    }

    /// Hides the icon and maps the original window again.
    pub fn restore(&mut self) -> Result<()> {
        let icon = self.icon.ok_or(IconError::NotCreated)?;

        self.conn.unmap_window(icon)?;
        self.conn.map_window(self.original)?;
        self.conn.flush()?;

        info!("restored {}", self.original);
        Ok(())
    }

    /// Destroys the icon window, if there is one.
    ///
    /// The original window is left as it is.
    pub fn destroy(mut self) -> Result<()> {
        if let Some(icon) = self.icon.take() {
            debug!("destroying icon window {}", icon);
            self.conn.destroy_window(icon)?;
            self.conn.flush()?;
        }
        Ok(())
    }

    /// The window that was iconified.
    pub fn original(&self) -> XWindowID {
        self.original
    }

    /// The icon window, once created.
    pub fn icon(&self) -> Option<XWindowID> {
        self.icon
    }

    /// The caption.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the icon artwork came from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Where the icon window is, in root coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    /// The unscaled icon artwork.
    pub fn source(&self) -> &Pixmap {
        &self.source
    }

    /// The icon's configuration.
    pub fn config(&self) -> &IconConfig {
        &self.config
    }

    fn draw(&self) -> Result<()> {
        let icon = self.icon.ok_or(IconError::NotCreated)?;
        draw::draw_icon(self.conn, icon, &self.source, &self.name, &self.config)
    }
}

impl<X: XConn> Drop for IconState<'_, X> {
    fn drop(&mut self) {
        if let Some(icon) = self.icon.take() {
            if let Err(e) = self.conn.destroy_window(icon) {
                warn!("could not destroy icon window {}: {}", icon, e);
            }
            if let Err(e) = self.conn.flush() {
                warn!("could not flush connection: {}", e);
            }
        }
    }
}

impl<X: XConn> fmt::Debug for IconState<'_, X> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("IconState")
            .field("original", &self.original)
            .field("icon", &self.icon)
            .field("source", &self.source)
            .field("name", &self.name)
            .field("path", &self.path)
            .field("position", &self.position)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::core::types::Color;
    use crate::x::dummy::{DummyConn, Request, ROOT};
    use crate::x::{
        event::{ClientMessageData, ExposeEvent},
        Property, XError, XEvent, Xid,
    };

    use interact::test::{close_message, motion, press, release};

    // the first id the dummy connection hands out
    const ICON: Xid = Xid(0x200000);

    fn setup() -> (DummyConn, XWindowID) {
        let conn = DummyConn::new();
        let frame = conn.add_window(10, ROOT, Rectangle::new(300, 200, 640, 480), true);
        let original = conn.add_window(11, frame, Rectangle::new(2, 18, 636, 460), true);
        conn.set_class(original, "xterm", "XTerm");

        (conn, original)
    }

    fn source() -> Pixmap {
        Pixmap::filled(48, 48, Color::from_hex(0x3366cc)).unwrap()
    }

    fn created<'a>(conn: &'a DummyConn, original: XWindowID) -> IconState<'a, DummyConn> {
        let config = IconConfig::builder()
            .border(1)
            .width(32)
            .height(32)
            .show_caption(true)
            .finish()
            .unwrap();

        let mut icon = IconState::new(conn, original, source(), None, None, config).unwrap();
        icon.create().unwrap();
        conn.clear_requests();
        icon
    }

    #[test_log::test]
    fn test_create_icon_window() {
        let (conn, original) = setup();
        let config = IconConfig::new();

        let mut icon = IconState::new(&conn, original, source(), None, None, config).unwrap();
        icon.create().unwrap();

        assert_eq!(icon.icon(), Some(ICON));
        assert_eq!(icon.position(), Point::new(302, 218));
        assert_eq!(
            conn.geometry_of(ICON),
            Some(Rectangle::new(302, 218, 34, 54))
        );
        assert!(conn.is_mapped(ICON));

        assert_eq!(
            conn.property(ICON, Atom::NetWmWindowType),
            Some(Property::Atom(vec![Atom::NetWindowTypeDesktop.to_string()]))
        );
        assert_eq!(
            conn.property(ICON, Atom::NetWmState),
            Some(Property::Atom(vec![Atom::NetWmStateBelow.to_string()]))
        );
        assert_eq!(
            conn.property(ICON, Atom::WmName),
            Some(Property::String(vec!["xterm".into()]))
        );
        assert_eq!(
            conn.property(ICON, Atom::WmProtocols),
            Some(Property::Atom(vec![Atom::WmDeleteWindow.to_string()]))
        );

        let requests = conn.requests();
        let mapped = requests
            .iter()
            .position(|r| *r == Request::Map(ICON))
            .unwrap();
        assert_eq!(
            requests[mapped + 1],
            Request::Configure(ICON, ClientConfig::StackingMode(StackMode::Below))
        );

        let change_state = conn.atom_of(Atom::WmChangeState);
        assert!(requests.iter().any(|r| match r {
            Request::Message(to, msg) => {
                *to == ROOT
                    && msg.window == original
                    && msg.type_ == change_state
                    && msg.data == ClientMessageData::U32([3, 0, 0, 0, 0])
            }
            _ => false,
        }));
    }

    #[test]
    fn test_create_twice() {
        let (conn, original) = setup();
        let mut icon = created(&conn, original);

        assert!(matches!(icon.create(), Err(IconError::AlreadyCreated)));
    }

    #[test_log::test]
    fn test_create_missing_target() {
        let (conn, _) = setup();

        let mut icon =
            IconState::new(&conn, Xid(0xdead), source(), None, None, IconConfig::new()).unwrap();

        assert!(matches!(
            icon.create(),
            Err(IconError::TargetWindow(Xid(0xdead), XError::UnknownWindow(_)))
        ));
        assert_eq!(icon.icon(), None);
        assert!(!conn
            .requests()
            .iter()
            .any(|r| matches!(r, Request::CreateWindow(..))));
    }

    #[test]
    fn test_names() {
        let (conn, original) = setup();
        let config = IconConfig::new();

        let named = IconState::new(
            &conn,
            original,
            source(),
            Some("editor".into()),
            None,
            config.clone(),
        )
        .unwrap();
        assert_eq!(named.name(), "editor");

        let classed =
            IconState::new(&conn, original, source(), Some(String::new()), None, config.clone())
                .unwrap();
        assert_eq!(classed.name(), "xterm");

        let bare = conn.add_window(20, ROOT, Rectangle::new(0, 0, 10, 10), true);
        let unknown = IconState::new(&conn, bare, source(), None, None, config.clone()).unwrap();
        assert_eq!(unknown.name(), UNKNOWN_NAME);

        let long = "x".repeat(150);
        let truncated = IconState::new(&conn, bare, source(), Some(long), None, config).unwrap();
        assert_eq!(truncated.name().chars().count(), MAX_NAME_CHARS);
    }

    #[test_log::test]
    fn test_artwork_path_kept() {
        let (conn, original) = setup();
        let path = PathBuf::from("/usr/share/icons/xterm.xpm");

        let mut icon = IconState::new(
            &conn,
            original,
            source(),
            None,
            Some(path.clone()),
            IconConfig::new(),
        )
        .unwrap();
        icon.create().unwrap();
        assert_eq!(icon.path(), Some(path.as_path()));

        let builtin = IconState::new(&conn, original, source(), None, None, IconConfig::new()).unwrap();
        assert_eq!(builtin.path(), None);
    }

    #[test]
    fn test_invalid_config() {
        let (conn, original) = setup();
        let config = IconConfig {
            width: 0,
            ..IconConfig::default()
        };

        assert!(matches!(
            IconState::new(&conn, original, source(), None, None, config),
            Err(IconError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_before_create() {
        let (conn, original) = setup();
        let mut icon =
            IconState::new(&conn, original, source(), None, None, IconConfig::new()).unwrap();

        assert!(matches!(icon.run(), Err(IconError::NotCreated)));
    }

    #[test_log::test]
    fn test_double_click_restores() {
        let (conn, original) = setup();
        let mut icon = created(&conn, original);
        conn.unmap_window(original).unwrap();

        conn.add_events([
            press(100, 100, 1000),
            release(100, 100, 1000),
            press(102, 101, 1090),
            release(102, 101, 1100),
        ]);

        assert_eq!(icon.run().unwrap(), Dismissal::Restored);
        assert!(conn.is_mapped(original));
        assert!(!conn.is_mapped(ICON));

        let requests = conn.requests();
        let unmapped = requests.iter().position(|r| *r == Request::Unmap(ICON));
        let remapped = requests.iter().position(|r| *r == Request::Map(original));
        assert!(unmapped.is_some() && unmapped < remapped);
    }

    #[test_log::test]
    fn test_close_while_dragging() {
        let (conn, original) = setup();
        let mut icon = created(&conn, original);
        conn.unmap_window(original).unwrap();

        let delete = conn.atom_of(Atom::WmDeleteWindow);
        conn.add_events([press(310, 230, 1000), close_message(delete)]);

        assert_eq!(icon.run().unwrap(), Dismissal::Closed);
        assert!(!conn.is_mapped(original));
        assert!(!conn
            .requests()
            .iter()
            .any(|r| *r == Request::Map(original)));
    }

    #[test]
    fn test_drag_moves_icon() {
        let (conn, original) = setup();
        let mut icon = created(&conn, original);
        let delete = conn.atom_of(Atom::WmDeleteWindow);

        // pressed 4 pixels into the icon
        conn.add_events([
            press(306, 222, 1000),
            motion(400, 300, 1010),
            motion(500, 350, 1020),
            release(500, 350, 1030),
            close_message(delete),
        ]);

        assert_eq!(icon.run().unwrap(), Dismissal::Closed);
        assert_eq!(icon.position(), Point::new(496, 346));
        assert_eq!(
            conn.geometry_of(ICON).map(|g| g.point),
            Some(Point::new(496, 346))
        );
    }

    #[test]
    fn test_expose_redraws() {
        let (conn, original) = setup();
        let mut icon = created(&conn, original);

        conn.add_event(XEvent::Expose(ExposeEvent {
            window: ICON,
            count: 0,
        }));

        // the queue runs dry after the redraw
        assert!(matches!(
            icon.run(),
            Err(IconError::Platform(XError::Connection(_)))
        ));
        assert!(!conn.draw_requests().is_empty());
    }

    #[test]
    fn test_destroy() {
        let (conn, original) = setup();
        let icon = created(&conn, original);

        icon.destroy().unwrap();
        assert!(!conn.exists(ICON));
        assert!(conn.exists(original));

        let dropped = created(&conn, original);
        let id = dropped.icon().unwrap();
        drop(dropped);
        assert!(!conn.exists(id));
        assert_eq!(conn.requests(), vec![Request::Destroy(id), Request::Flush]);
    }
}
