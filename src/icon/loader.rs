//! Finding and loading icon artwork.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::IconConfig;
use crate::core::{pixmap::Pixmap, xpm};
use crate::x::{XConn, XWindowID};
use crate::{IconError, Result};

/// Reads and decodes an XPM file.
pub fn read_xpm<P: AsRef<Path>>(path: P) -> Result<Pixmap> {
    let data = fs::read(path.as_ref())?;
    let text = String::from_utf8_lossy(&data);

    Ok(xpm::parse(&text)?)
}

/// Loads the icon for `window`.
///
/// The candidates are tried in order, and the first that can be read
/// and decoded wins:
///
/// 1. `path`, if given.
/// 2. `<pixmap dir>/<class>.xpm`, where `class` is the class part of
///    the window's `WM_CLASS`.
/// 3. The configured default icon.
///
/// Returns [`IconError::NoIcon`] if none of them work out.
pub fn load_icon<X: XConn>(
    conn: &X,
    path: Option<&Path>,
    window: XWindowID,
    config: &IconConfig,
) -> Result<Pixmap> {
    let mut candidates: Vec<PathBuf> = Vec::with_capacity(3);

    if let Some(path) = path {
        candidates.push(path.to_path_buf());
    }

    match conn.get_wm_class(window) {
        Some((_, class)) if !class.is_empty() => {
            candidates.push(config.pixmap_dir().join(format!("{}.xpm", class)));
        }
        _ => debug!("no class for window {}, skipping class icon", window),
    }

    candidates.push(config.default_icon().to_path_buf());

    for candidate in candidates {
        if !candidate.exists() {
            debug!("{} does not exist", candidate.display());
            continue;
        }
        match read_xpm(&candidate) {
            Ok(pixmap) => {
                info!(
                    "loaded {}x{} icon from {}",
                    pixmap.width(),
                    pixmap.height(),
                    candidate.display()
                );
                return Ok(pixmap);
            }
            Err(e) => warn!("could not load {}: {}", candidate.display(), e),
        }
    }

    Err(IconError::NoIcon)
}
