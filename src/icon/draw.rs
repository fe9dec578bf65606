//! Painting the icon window.

use tracing::trace;

use crate::config::{IconConfig, Layers};
use crate::core::pixmap::Pixmap;
use crate::x::{core::TextItem, XConn, XWindowID};
use crate::Result;

/// Draws the icon onto `window`, bottom layer first.
///
/// Every call repaints the whole window, so this can be called as often
/// as the window is exposed. The image is scaled to the configured
/// size on every call and dropped once it has been uploaded.
pub(crate) fn draw_icon<X: XConn>(
    conn: &X,
    window: XWindowID,
    source: &Pixmap,
    caption: &str,
    config: &IconConfig,
) -> Result<()> {
    let layers = config.layers();
    trace!("drawing {:?} onto {}", layers, window);

    if layers.contains(Layers::BACKGROUND) {
        conn.fill_rectangle(window, config.window_rect(), config.neutral())?;
    }

    if layers.contains(Layers::BORDER) && config.border() > 0 {
        conn.fill_rectangle(window, config.window_rect(), config.frame())?;
        conn.fill_rectangle(window, config.inner_rect(), config.neutral())?;
    }

    if layers.contains(Layers::IMAGE) {
        let size = config.content_size();
        let scaled = source.scale(size.width, size.height, config.neutral())?;
        conn.put_image(window, config.content_rect().point, &scaled)?;
    }

    if layers.contains(Layers::CAPTION) {
        if let Some(band) = config.caption_rect() {
            conn.fill_rectangle(window, band, config.caption_bg())?;
            conn.draw_text(
                window,
                TextItem {
                    text: caption,
                    origin: config.caption_origin(),
                },
                config.caption_fg(),
            )?;
        }
    }

    conn.flush()?;
    Ok(())
}
