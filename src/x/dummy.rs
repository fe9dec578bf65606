#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};

use strum::IntoEnumIterator;

use crate::core::pixmap::Pixmap;
use crate::core::types::{Color, Point, Rectangle, Size};
use crate::x::{
    atom::{Atom, Atoms},
    core::{
        ClientConfig, MapState, Result, TextItem, TreeReply, WindowAttributes, WindowClass, XAtom,
        XConn, XError, XWindow, XWindowID, Xid,
    },
    event::{ClientMessageEvent, XEvent},
    property::Property,
};

/// A request recorded by the dummy connection.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Request {
    CreateWindow(XWindowID, Rectangle),
    Map(XWindowID),
    Unmap(XWindowID),
    Destroy(XWindowID),
    Configure(XWindowID, ClientConfig),
    Message(XWindowID, ClientMessageEvent),
    SetProperty(XWindowID, String),
    Fill(XWindowID, Rectangle, Color),
    PutImage(XWindowID, Point, Size),
    Text(XWindowID, String, Point, Color),
    Flush,
}

#[derive(Debug, Clone)]
struct DummyWindow {
    geom: Rectangle,
    map_state: MapState,
    parent: Option<XWindowID>,
    props: HashMap<String, Property>,
}

/// A dummy connection implementing XConn but actually
/// does not interface with the X server at all, and
/// should only be used for testing.
///
/// `DummyConn` contains an internal queue of XEvents that
/// are dequeued when `wait_for_event` is called, an internal
/// store of windows forming a tree under the root, and a log
/// of every request that changes server state.
///
/// When the event queue runs dry, `wait_for_event` returns
/// a connection error, as if the server had gone away.
#[derive(Debug)]
pub(crate) struct DummyConn {
    root: XWindow,
    windows: RefCell<HashMap<XWindowID, DummyWindow>>,
    events: RefCell<VecDeque<XEvent>>,
    requests: RefCell<Vec<Request>>,
    atoms: RefCell<Atoms>,
    failing: RefCell<HashSet<XWindowID>>,
    next_id: Cell<u32>,
    next_atom: Cell<u32>,
}

pub(crate) const ROOT: Xid = Xid(1);

impl DummyConn {
    /// Creates a new DummyConn with a 1920x1080 root window.
    pub fn new() -> Self {
        let root = XWindow::with_data(ROOT, Rectangle::new(0, 0, 1920, 1080));

        let mut atoms = Atoms::new();
        let mut next_atom = 100;
        for atom in Atom::iter() {
            atoms.insert(atom.as_ref(), Xid(next_atom));
            next_atom += 1;
        }

        let mut windows = HashMap::new();
        windows.insert(
            ROOT,
            DummyWindow {
                geom: root.geom,
                map_state: MapState::Viewable,
                parent: None,
                props: HashMap::new(),
            },
        );

        Self {
            root,
            windows: RefCell::new(windows),
            events: RefCell::new(VecDeque::new()),
            requests: RefCell::new(Vec::new()),
            atoms: RefCell::new(atoms),
            failing: RefCell::new(HashSet::new()),
            next_id: Cell::new(0x200000),
            next_atom: Cell::new(next_atom),
        }
    }

    /// Adds a window under `parent`.
    pub fn add_window(&self, id: u32, parent: XWindowID, geom: Rectangle, viewable: bool) -> Xid {
        let id = Xid(id);
        self.windows.borrow_mut().insert(
            id,
            DummyWindow {
                geom,
                map_state: if viewable {
                    MapState::Viewable
                } else {
                    MapState::Unmapped
                },
                parent: Some(parent),
                props: HashMap::new(),
            },
        );
        id
    }

    /// Sets WM_CLASS on a window.
    pub fn set_class(&self, id: XWindowID, instance: &str, class: &str) {
        if let Some(win) = self.windows.borrow_mut().get_mut(&id) {
            win.props.insert(
                Atom::WmClass.to_string(),
                Property::String(vec![instance.into(), class.into()]),
            );
        }
    }

    /// Makes every query on `id` fail.
    pub fn fail_queries(&self, id: XWindowID) {
        self.failing.borrow_mut().insert(id);
    }

    /// Adds a single event to the internal queue to be sent out by
    /// `XConn::wait_for_event`.
    pub fn add_event(&self, event: XEvent) {
        self.events.borrow_mut().push_back(event);
    }

    /// Adds multiple events to the internal queue.
    pub fn add_events<I>(&self, events: I)
    where
        I: IntoIterator<Item = XEvent>,
    {
        self.events.borrow_mut().extend(events);
    }

    /// The requests made so far.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    /// The drawing requests made so far.
    pub fn draw_requests(&self) -> Vec<Request> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| {
                matches!(
                    r,
                    Request::Fill(..) | Request::PutImage(..) | Request::Text(..)
                )
            })
            .cloned()
            .collect()
    }

    pub fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
    }

    pub fn exists(&self, id: XWindowID) -> bool {
        self.windows.borrow().contains_key(&id)
    }

    pub fn is_mapped(&self, id: XWindowID) -> bool {
        self.windows
            .borrow()
            .get(&id)
            .map(|w| w.map_state != MapState::Unmapped)
            .unwrap_or(false)
    }

    pub fn geometry_of(&self, id: XWindowID) -> Option<Rectangle> {
        self.windows.borrow().get(&id).map(|w| w.geom)
    }

    pub fn property(&self, id: XWindowID, prop: Atom) -> Option<Property> {
        self.windows
            .borrow()
            .get(&id)
            .and_then(|w| w.props.get(prop.as_ref()).cloned())
    }

    pub fn atom_of(&self, atom: Atom) -> XAtom {
        self.atoms.borrow().retrieve(atom.as_ref()).unwrap_or(Xid(0))
    }

    fn record(&self, req: Request) {
        self.requests.borrow_mut().push(req);
    }

    fn with_window<T, F>(&self, id: XWindowID, f: F) -> Result<T>
    where
        F: FnOnce(&mut DummyWindow) -> T,
    {
        if self.failing.borrow().contains(&id) {
            return Err(XError::UnknownWindow(id));
        }
        self.windows
            .borrow_mut()
            .get_mut(&id)
            .map(f)
            .ok_or(XError::UnknownWindow(id))
    }
}

impl XConn for DummyConn {
    fn wait_for_event(&self) -> Result<XEvent> {
        self.events
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| XError::Connection("event queue exhausted".into()))
    }

    fn get_root(&self) -> XWindow {
        self.root
    }

    fn get_geometry(&self, window: XWindowID) -> Result<Rectangle> {
        self.with_window(window, |w| w.geom)
    }

    fn get_window_attributes(&self, window: XWindowID) -> Result<WindowAttributes> {
        self.with_window(window, |w| WindowAttributes {
            map_state: w.map_state,
            override_redirect: false,
        })
    }

    fn query_tree(&self, window: XWindowID) -> Result<TreeReply> {
        let parent = self.with_window(window, |w| w.parent)?;
        let children = self
            .windows
            .borrow()
            .iter()
            .filter(|(_, w)| w.parent == Some(window))
            .map(|(id, _)| *id)
            .collect();

        Ok(TreeReply {
            root: ROOT,
            parent,
            children,
        })
    }

    fn atom(&self, atom: &str) -> Result<XAtom> {
        if let Some(known) = self.atoms.borrow().retrieve(atom) {
            return Ok(known);
        }
        let new = Xid(self.next_atom.get());
        self.next_atom.set(new.val() + 1);
        self.atoms.borrow_mut().insert(atom, new);
        Ok(new)
    }

    fn lookup_atom(&self, atom: XAtom) -> Result<String> {
        self.atoms
            .borrow()
            .retrieve_by_value(atom)
            .ok_or_else(|| XError::OtherError(format!("unknown atom {}", atom)))
    }

    fn get_property(&self, prop: &str, window: XWindowID) -> Result<Option<Property>> {
        self.with_window(window, |w| w.props.get(prop).cloned())
    }

    fn set_property(&self, window: XWindowID, prop: &str, data: Property) -> Result<()> {
        self.with_window(window, |w| w.props.insert(prop.into(), data))?;
        self.record(Request::SetProperty(window, prop.into()));
        Ok(())
    }

    fn create_window(&self, ty: WindowClass, geom: Rectangle) -> Result<XWindowID> {
        let WindowClass::InputOutput(window_type) = ty;

        let id = Xid(self.next_id.get());
        self.next_id.set(id.val() + 1);

        self.windows.borrow_mut().insert(
            id,
            DummyWindow {
                geom,
                map_state: MapState::Unmapped,
                parent: Some(ROOT),
                props: HashMap::new(),
            },
        );
        self.record(Request::CreateWindow(id, geom));

        self.set_property(
            id,
            Atom::NetWmWindowType.as_ref(),
            Property::Atom(vec![window_type.to_string()]),
        )?;

        Ok(id)
    }

    fn map_window(&self, window: XWindowID) -> Result<()> {
        self.with_window(window, |w| w.map_state = MapState::Viewable)?;
        self.record(Request::Map(window));
        Ok(())
    }

    fn unmap_window(&self, window: XWindowID) -> Result<()> {
        self.with_window(window, |w| w.map_state = MapState::Unmapped)?;
        self.record(Request::Unmap(window));
        Ok(())
    }

    fn destroy_window(&self, window: XWindowID) -> Result<()> {
        self.windows
            .borrow_mut()
            .remove(&window)
            .ok_or(XError::UnknownWindow(window))?;
        self.record(Request::Destroy(window));
        Ok(())
    }

    fn configure_window(&self, window: XWindowID, attrs: &[ClientConfig]) -> Result<()> {
        for attr in attrs {
            if let ClientConfig::Move { x, y } = attr {
                self.with_window(window, |w| w.geom.point = Point::new(*x, *y))?;
            }
            self.record(Request::Configure(window, *attr));
        }
        Ok(())
    }

    fn send_client_message(&self, window: XWindowID, data: ClientMessageEvent) -> Result<()> {
        self.record(Request::Message(window, data));
        Ok(())
    }

    fn fill_rectangle(&self, window: XWindowID, rect: Rectangle, color: Color) -> Result<()> {
        self.record(Request::Fill(window, rect, color));
        Ok(())
    }

    fn put_image(&self, window: XWindowID, origin: Point, image: &Pixmap) -> Result<()> {
        self.record(Request::PutImage(window, origin, image.size()));
        Ok(())
    }

    fn draw_text(&self, window: XWindowID, text: TextItem<'_>, color: Color) -> Result<()> {
        self.record(Request::Text(window, text.text.into(), text.origin, color));
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.record(Request::Flush);
        Ok(())
    }
}
