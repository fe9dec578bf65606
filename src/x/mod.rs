//! Types and traits providing a unified interface with the X server.
//!
//! This module provides iconify's interface to the X server.
//! The core of this module is the `XConn` trait, which defines the
//! interface by which the icon retrieves data from and sets data on
//! the X server, using iconify types for abstraction.
//!
//! For a concrete implementation of the trait exported here, see
//! the [`x11rb`] submodule.
//!
//! ## Connection Object Initialization
//!
//! [`X11RBConn`] has two states: uninitialized, and initialized,
//! marked in its type constructor. Uninitialized connections have only
//! established a connection to the server, and have not initialized
//! any of the internal state required for them to be able to safely
//! call any of their methods. Thus, `XConn` is only implemented for
//! initialized connections, and users will have to call the `init`
//! method for a connection object to be usable.

pub mod atom;
pub mod core;
pub mod event;
pub mod input;
pub mod property;
pub mod traits;

/// Implementation of `XConn` backed by the `x11rb` library.
pub mod x11rb;

#[doc(inline)]
pub use self::core::{Result, XAtom, XConn, XError, XWindow, XWindowID, Xid};
#[doc(inline)]
pub use atom::{Atom, Atoms};
#[doc(inline)]
pub use event::XEvent;
#[doc(inline)]
pub use property::Property;

#[doc(inline)]
pub use self::x11rb::X11RBConn;
#[doc(inline)]
pub use status::ConnStatus;
pub(crate) use status::{Initialized, Uninitialized};

/* the dummy connection is used for testing higher-level
code and does not talk to an actual X server, so it is
always available under test */
#[cfg(test)]
pub(crate) mod dummy;

pub mod status {
    //! Types for representing connection status.
    //!
    //! This module contains the [`ConnStatus`] sealed trait,
    //! as well as its two implementors, [`Initialized`] and
    //! [`Uninitialized`]. These are used to mark the state of
    //! the connection object, and act as guards to only
    //! expose [`XConn`](crate::x::XConn) methods when safe
    //! to do so.
    mod private {
        pub trait Sealed {}
    }

    /// A trait defining marker types `Uninitialized` and `Initialized`.
    pub trait ConnStatus: private::Sealed {}

    /// A marker struct indicating a connection is uninitialized.
    ///
    /// Uninitialized connections do not expose any methods.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Uninitialized;

    impl ConnStatus for Uninitialized {}
    impl private::Sealed for Uninitialized {}

    /// A marker type indicating a connection is initialized and can be used.
    ///
    /// Initialized connections expose all available methods.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Initialized;

    impl ConnStatus for Initialized {}
    impl private::Sealed for Initialized {}
}

// various backend-agnostic conversion implementations

use std::string::FromUtf8Error;

impl From<FromUtf8Error> for XError {
    fn from(e: FromUtf8Error) -> XError {
        XError::InvalidPropertyData(format!("Invalid UTF8 data: {}", e))
    }
}
