//! Finding where a window is on screen.
//!
//! X only tells us where a window is relative to its parent, and
//! reparenting window managers put top-level windows inside frames,
//! so the absolute position has to be summed up along the parent chain.

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::core::types::Point;
use crate::x::{XConn, XError, XWindowID};

/// A query failed partway up the window tree.
#[derive(Debug, Clone, Error)]
#[error("could not query window {window} at depth {depth}: {source}")]
pub struct ResolveError {
    /// How many parents up from the starting window the failure happened.
    /// Zero is the starting window itself.
    pub depth: usize,
    /// The window that could not be queried.
    pub window: XWindowID,
    /// What went wrong.
    #[source]
    pub source: XError,
}

/// Computes the absolute position of `window` on its screen.
///
/// The position of every viewable window from `window` up to the root
/// is added together. Unmapped windows along the way do not count.
/// If any query fails, the walk stops and the failure is returned
/// along with how far up it happened.
pub fn resolve_origin<X: XConn>(conn: &X, window: XWindowID) -> Result<Point, ResolveError> {
    let mut current = window;
    let mut depth = 0;
    let mut origin = Point::new(0, 0);

    loop {
        let fail = move |source| ResolveError {
            depth,
            window: current,
            source,
        };

        let geom = conn.get_geometry(current).map_err(fail)?;
        let attrs = conn.get_window_attributes(current).map_err(fail)?;

        if attrs.is_viewable() {
            origin = origin.offset(geom.point.x, geom.point.y);
        }
        trace!(
            "window {} at {} (viewable: {}), running total {}",
            current,
            geom.point,
            attrs.is_viewable(),
            origin
        );

        match conn.query_tree(current).map_err(fail)?.parent {
            Some(parent) => {
                current = parent;
                depth += 1;
            }
            None => break,
        }
    }

    debug!("window {} resolved to {}", window, origin);
    Ok(origin)
}

/// Decides where the icon for `window` goes.
///
/// This is the absolute position of `window`, unless either coordinate
/// is negative or a parent could not be queried, in which case
/// `fallback` is used instead. A failure to query `window` itself
/// is returned as an error, since the window is most likely gone.
pub fn place<X: XConn>(
    conn: &X,
    window: XWindowID,
    fallback: Point,
) -> Result<Point, ResolveError> {
    match resolve_origin(conn, window) {
        Ok(origin) if origin.is_negative() => {
            debug!("{} is off screen, using {}", origin, fallback);
            Ok(fallback)
        }
        Ok(origin) => Ok(origin),
        Err(e) if e.depth == 0 => Err(e),
        Err(e) => {
            warn!("{}, using {}", e, fallback);
            Ok(fallback)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::core::types::Rectangle;
    use crate::x::dummy::{DummyConn, ROOT};
    use crate::x::Xid;

    const FALLBACK: Point = Point::new(240, 240);

    // root -> frame (100, 50) -> hidden (5, 20) -> target (3, 4)
    fn nested() -> (DummyConn, XWindowID) {
        let conn = DummyConn::new();
        let frame = conn.add_window(10, ROOT, Rectangle::new(100, 50, 400, 300), true);
        let hidden = conn.add_window(11, frame, Rectangle::new(5, 20, 390, 270), false);
        let target = conn.add_window(12, hidden, Rectangle::new(3, 4, 200, 100), true);

        (conn, target)
    }

    #[test]
    fn test_resolve_sums_viewable() {
        let (conn, target) = nested();

        let origin = resolve_origin(&conn, target).unwrap();
        assert_eq!(origin, Point::new(103, 54));
        assert_eq!(place(&conn, target, FALLBACK).unwrap(), Point::new(103, 54));
    }

    #[test]
    fn test_resolve_top_level() {
        let conn = DummyConn::new();
        let win = conn.add_window(20, ROOT, Rectangle::new(640, 480, 10, 10), true);

        assert_eq!(resolve_origin(&conn, win).unwrap(), Point::new(640, 480));
    }

    #[test]
    fn test_negative_uses_fallback() {
        let conn = DummyConn::new();
        // only x is negative, but both axes are replaced
        let win = conn.add_window(20, ROOT, Rectangle::new(-30, 700, 10, 10), true);

        assert_eq!(resolve_origin(&conn, win).unwrap(), Point::new(-30, 700));
        assert_eq!(place(&conn, win, FALLBACK).unwrap(), FALLBACK);

        // same for y alone
        let win = conn.add_window(21, ROOT, Rectangle::new(700, -30, 10, 10), true);
        assert_eq!(resolve_origin(&conn, win).unwrap(), Point::new(700, -30));
        assert_eq!(place(&conn, win, FALLBACK).unwrap(), FALLBACK);
    }

    #[test_log::test]
    fn test_parent_failure_uses_fallback() {
        let (conn, target) = nested();
        conn.fail_queries(Xid(10));

        let err = resolve_origin(&conn, target).unwrap_err();
        assert_eq!(err.depth, 2);
        assert_eq!(err.window, Xid(10));

        assert_eq!(place(&conn, target, FALLBACK).unwrap(), FALLBACK);
    }

    #[test]
    fn test_target_failure_is_error() {
        let (conn, target) = nested();
        conn.fail_queries(target);

        let err = place(&conn, target, FALLBACK).unwrap_err();
        assert_eq!(err.depth, 0);
        assert!(matches!(err.source, XError::UnknownWindow(_)));
    }
}
