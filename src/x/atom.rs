//! X atoms known to iconify.

use std::collections::HashMap;
use std::str::FromStr;

use strum::*;
use strum_macros::EnumIter;

use super::core::XAtom;

/// Internal representations of the X atoms this crate uses.
///
/// This allows for some measure of type safety around dealing with atoms.
/// Every variant is interned when a connection is initialized.
#[derive(AsRefStr, Display, EnumString, EnumIter, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Atom {
    /// ATOM
    #[strum(serialize = "ATOM")]
    Atom,
    /// CARDINAL
    #[strum(serialize = "CARDINAL")]
    Cardinal,
    /// WINDOW
    #[strum(serialize = "WINDOW")]
    Window,
    /// STRING
    #[strum(serialize = "STRING")]
    String,
    /// UTF8_STRING
    #[strum(serialize = "UTF8_STRING")]
    UTF8String,
    /// WM_CLASS
    #[strum(serialize = "WM_CLASS")]
    WmClass,
    /// WM_NAME
    #[strum(serialize = "WM_NAME")]
    WmName,
    /// WM_ICON_NAME
    #[strum(serialize = "WM_ICON_NAME")]
    WmIconName,
    /// WM_PROTOCOLS
    #[strum(serialize = "WM_PROTOCOLS")]
    WmProtocols,
    /// WM_DELETE_WINDOW
    #[strum(serialize = "WM_DELETE_WINDOW")]
    WmDeleteWindow,
    /// WM_CHANGE_STATE
    #[strum(serialize = "WM_CHANGE_STATE")]
    WmChangeState,
    /// _NET_WM_WINDOW_TYPE
    #[strum(serialize = "_NET_WM_WINDOW_TYPE")]
    NetWmWindowType,
    /// _NET_WM_WINDOW_TYPE_DESKTOP
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_DESKTOP")]
    NetWindowTypeDesktop,
    /// _NET_WM_STATE
    #[strum(serialize = "_NET_WM_STATE")]
    NetWmState,
    /// _NET_WM_STATE_BELOW
    #[strum(serialize = "_NET_WM_STATE_BELOW")]
    NetWmStateBelow,
}

/// A cache of interned atoms.
///
/// Atoms with an [`Atom`] variant are stored by variant,
/// everything else by name.
#[derive(Debug, Clone, Default)]
pub struct Atoms {
    /// Known atoms that can be managed as their enum variants.
    known: HashMap<Atom, XAtom>,
    /// Unknown atoms that have to be managed as strings.
    interned: HashMap<String, XAtom>,
}

impl Atoms {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an atom under its name.
    pub fn insert(&mut self, atom: &str, val: XAtom) {
        if let Ok(known) = Atom::from_str(atom) {
            self.known.insert(known, val);
        } else {
            self.interned.insert(atom.into(), val);
        }
    }

    /// Looks up an atom by its name.
    pub fn retrieve(&self, atom: &str) -> Option<XAtom> {
        if let Ok(known) = Atom::from_str(atom) {
            self.known.get(&known).copied()
        } else {
            self.interned.get(atom).copied()
        }
    }

    /// Looks up the name of an atom by its value.
    pub fn retrieve_by_value(&self, atom: XAtom) -> Option<String> {
        if let Some((known, _)) = self.known.iter().find(|(_, v)| **v == atom) {
            Some(known.to_string())
        } else {
            self.interned
                .iter()
                .find(|(_, v)| **v == atom)
                .map(|(k, _)| k.clone())
        }
    }
}
