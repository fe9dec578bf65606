//! Turning pointer input into icon actions.
//!
//! The icon responds to the primary button only. Pressing it starts a
//! drag, and the icon follows the pointer until the button is released.
//! A press and release that barely moved the pointer is a click, and
//! two clicks in quick succession restore the original window.

use tracing::{debug, trace};

use crate::config::IconConfig;
use crate::core::types::Point;
use crate::x::{
    event::{ClientMessageEvent, MouseEvent},
    input::MouseEventKind,
    XAtom, XEvent,
};

/// Whether the icon is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// The primary button is up.
    #[default]
    Idle,
    /// The primary button is down.
    Dragging {
        /// Where the button went down, in root coordinates.
        press: Point,
        /// Where the button went down, relative to the icon window.
        offset: Point,
    },
}

/// What the icon should do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconAction {
    /// Move the icon window to the given position.
    Move(Point),
    /// Repaint the icon.
    Redraw,
    /// Bring back the original window and go away.
    Restore,
    /// Go away, leaving the original window iconified.
    Close,
}

/// The state machine behind the icon's event loop.
#[derive(Debug, Clone)]
pub struct Interaction {
    state: DragState,
    last_click: Option<u32>,
    threshold: u32,
    double_click_ms: u32,
    close_atom: XAtom,
}

impl Interaction {
    /// Creates a new state machine, taking its thresholds from `config`.
    ///
    /// `close_atom` is the atom a close request carries, usually
    /// `WM_DELETE_WINDOW`.
    pub fn new(config: &IconConfig, close_atom: XAtom) -> Self {
        Self {
            state: DragState::Idle,
            last_click: None,
            threshold: config.click_threshold(),
            double_click_ms: config.double_click_ms(),
            close_atom,
        }
    }

    /// The current drag state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Feeds an event into the state machine.
    ///
    /// Returns the action to take, if any. Events that mean nothing
    /// in the current state are ignored.
    pub fn handle(&mut self, event: &XEvent) -> Option<IconAction> {
        match event {
            XEvent::Expose(_) => Some(IconAction::Redraw),
            XEvent::MouseEvent(ev) => self.on_mouse(ev),
            XEvent::ClientMessage(msg) => self.on_message(msg),
            XEvent::Unknown(_) => None,
        }
    }

    fn on_mouse(&mut self, ev: &MouseEvent) -> Option<IconAction> {
        use MouseEventKind::*;

        if let Some(button) = ev.button {
            if !button.is_primary() {
                trace!("ignoring {:?}", button);
                return None;
            }
        }

        match (ev.kind, self.state) {
            (Press, DragState::Idle) => {
                self.state = DragState::Dragging {
                    press: ev.root,
                    offset: ev.rel,
                };
                None
            }
            (Motion, DragState::Dragging { offset, .. }) => Some(IconAction::Move(Point::new(
                ev.root.x - offset.x,
                ev.root.y - offset.y,
            ))),
            (Release, DragState::Dragging { press, .. }) => {
                self.state = DragState::Idle;

                let (dx, dy) = press.delta_to(ev.root);
                if dx.unsigned_abs() <= self.threshold && dy.unsigned_abs() <= self.threshold {
                    self.on_click(ev.time)
                } else {
                    trace!("drag ended {} away", Point::new(dx, dy));
                    None
                }
            }
            _ => None,
        }
    }

    fn on_click(&mut self, time: u32) -> Option<IconAction> {
        match self.last_click {
            Some(prev) if time.wrapping_sub(prev) <= self.double_click_ms => {
                debug!("double click after {}ms", time.wrapping_sub(prev));
                self.last_click = None;
                Some(IconAction::Restore)
            }
            _ => {
                self.last_click = Some(time);
                None
            }
        }
    }

    fn on_message(&mut self, msg: &ClientMessageEvent) -> Option<IconAction> {
        if msg.data.first_u32() == Some(self.close_atom.val()) {
            debug!("close requested");
            Some(IconAction::Close)
        } else {
            trace!("ignoring client message of type {}", msg.type_);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    use crate::x::{
        event::{ClientMessageData, ExposeEvent},
        input::{ButtonIndex, ButtonMask},
        Xid,
    };

    const ICON: Xid = Xid(0x200000);
    const CLOSE: Xid = Xid(300);

    fn mouse(
        kind: MouseEventKind,
        button: Option<ButtonIndex>,
        root: Point,
        rel: Point,
        time: u32,
    ) -> XEvent {
        XEvent::MouseEvent(MouseEvent {
            id: ICON,
            kind,
            button,
            mask: ButtonMask::empty(),
            root,
            rel,
            time,
        })
    }

    pub(crate) fn press(x: i32, y: i32, time: u32) -> XEvent {
        mouse(
            MouseEventKind::Press,
            Some(ButtonIndex::Left),
            Point::new(x, y),
            Point::new(4, 4),
            time,
        )
    }

    pub(crate) fn release(x: i32, y: i32, time: u32) -> XEvent {
        mouse(
            MouseEventKind::Release,
            Some(ButtonIndex::Left),
            Point::new(x, y),
            Point::new(4, 4),
            time,
        )
    }

    pub(crate) fn motion(x: i32, y: i32, time: u32) -> XEvent {
        mouse(MouseEventKind::Motion, None, Point::new(x, y), Point::new(4, 4), time)
    }

    pub(crate) fn close_message(atom: XAtom) -> XEvent {
        XEvent::ClientMessage(ClientMessageEvent {
            window: ICON,
            data: ClientMessageData::U32([atom.val(), 0, 0, 0, 0]),
            type_: Xid(301),
        })
    }

    fn machine() -> Interaction {
        Interaction::new(&IconConfig::new(), CLOSE)
    }

    #[test]
    fn test_small_displacement_is_click() {
        let mut im = machine();

        assert_eq!(im.handle(&press(100, 100, 1000)), None);
        assert!(matches!(im.state(), DragState::Dragging { .. }));
        assert_eq!(im.handle(&release(103, 103, 1050)), None);
        assert_eq!(im.state(), DragState::Idle);
        assert_eq!(im.last_click, Some(1050));
    }

    #[test]
    fn test_large_displacement_is_drag() {
        let mut im = machine();
        im.last_click = Some(900);

        im.handle(&press(100, 100, 1000));
        assert_eq!(im.handle(&release(110, 100, 1050)), None);
        assert_eq!(im.state(), DragState::Idle);
        // a drag leaves click timing alone
        assert_eq!(im.last_click, Some(900));
    }

    #[test]
    fn test_double_click_restores() {
        let mut im = machine();

        im.handle(&press(100, 100, 1000));
        im.handle(&release(100, 100, 1010));
        im.handle(&press(100, 100, 1150));
        assert_eq!(im.handle(&release(101, 100, 1210)), Some(IconAction::Restore));
    }

    #[test]
    fn test_slow_clicks_reset_reference() {
        let mut im = machine();

        im.handle(&press(100, 100, 1000));
        im.handle(&release(100, 100, 1000));
        im.handle(&press(100, 100, 1800));
        assert_eq!(im.handle(&release(100, 100, 1900)), None);
        assert_eq!(im.last_click, Some(1900));

        // measured from the second click, not the first
        im.handle(&press(100, 100, 2300));
        assert_eq!(im.handle(&release(100, 100, 2300)), Some(IconAction::Restore));
    }

    #[test]
    fn test_click_interval_wraps() {
        let mut im = machine();
        im.last_click = Some(u32::MAX - 50);

        im.handle(&press(10, 10, 49));
        assert_eq!(im.handle(&release(10, 10, 49)), Some(IconAction::Restore));
    }

    #[test]
    fn test_motion_follows_pointer() {
        let mut im = machine();

        assert_eq!(im.handle(&motion(50, 50, 900)), None);

        im.handle(&press(100, 100, 1000));
        assert_eq!(
            im.handle(&motion(120, 90, 1010)),
            Some(IconAction::Move(Point::new(116, 86)))
        );
        assert_eq!(
            im.handle(&motion(300, 400, 1020)),
            Some(IconAction::Move(Point::new(296, 396)))
        );
        im.handle(&release(300, 400, 1030));
        assert_eq!(im.handle(&motion(310, 410, 1040)), None);
    }

    #[test]
    fn test_close_and_redraw() {
        let mut im = machine();

        im.handle(&press(100, 100, 1000));
        assert_eq!(im.handle(&close_message(CLOSE)), Some(IconAction::Close));
        assert_eq!(im.handle(&close_message(Xid(999))), None);

        let expose = XEvent::Expose(ExposeEvent {
            window: ICON,
            count: 0,
        });
        assert_eq!(im.handle(&expose), Some(IconAction::Redraw));
        assert!(matches!(im.state(), DragState::Dragging { .. }));
    }

    #[test]
    fn test_ignored_events() {
        let mut im = machine();

        assert_eq!(im.handle(&release(100, 100, 1000)), None);
        assert_eq!(im.last_click, None);

        let right = mouse(
            MouseEventKind::Press,
            Some(ButtonIndex::Right),
            Point::new(1, 1),
            Point::new(1, 1),
            1000,
        );
        assert_eq!(im.handle(&right), None);
        assert_eq!(im.state(), DragState::Idle);
        assert_eq!(im.handle(&XEvent::Unknown("MapNotify".into())), None);
    }
}
