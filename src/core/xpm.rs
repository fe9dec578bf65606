//! A decoder for XPM (X PixMap) images.
//!
//! Only XPM3, the C-source flavour that every modern tool writes, is
//! understood. The decoder pulls every quoted string out of the file in
//! order, ignoring comments and the surrounding C declarations, and reads
//! them as the values line, the color table and the pixel rows.

use std::collections::HashMap;

use thiserror::Error;
use tracing::trace;

use super::pixmap::{Pixmap, PixmapError, TRANSPARENT};

const OPAQUE: u32 = 0xFF00_0000;

// color keys, in order of preference
const COLOR_KEYS: &[&str] = &["c", "g", "g4", "m"];
const ALL_KEYS: &[&str] = &["c", "g", "g4", "m", "s"];

const MAX_PREALLOC: usize = 4096;

/// Everything that can be wrong with an XPM file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XpmError {
    /// The file contains no quoted strings at all.
    #[error("no XPM data found")]
    MissingHeader,

    /// The values line could not be parsed.
    #[error("invalid values line: {0:?}")]
    InvalidHeader(String),

    /// The color table ended early.
    #[error("expected {expected} colors, found {found}")]
    MissingColors {
        #[allow(missing_docs)]
        expected: usize,
        #[allow(missing_docs)]
        found: usize,
    },

    /// A color table entry could not be understood.
    #[error("invalid color definition {0:?}")]
    InvalidColor(String),

    /// A color name that is not known to the decoder.
    #[error("unknown color {0:?}")]
    UnknownColor(String),

    /// The pixel data ended early.
    #[error("expected {expected} rows, found {found}")]
    MissingRows {
        #[allow(missing_docs)]
        expected: usize,
        #[allow(missing_docs)]
        found: usize,
    },

    /// A pixel row is too short.
    #[error("row {row} is {got} bytes long, expected at least {expected}")]
    RowLength {
        #[allow(missing_docs)]
        row: usize,
        #[allow(missing_docs)]
        expected: usize,
        #[allow(missing_docs)]
        got: usize,
    },

    /// A pixel refers to a color that is not in the color table.
    #[error("undefined pixel {chars:?} in row {row}")]
    UndefinedPixel {
        #[allow(missing_docs)]
        row: usize,
        #[allow(missing_docs)]
        chars: String,
    },

    /// The image dimensions are invalid.
    #[error(transparent)]
    Pixmap(#[from] PixmapError),
}

/// The values line of an XPM file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    width: u32,
    height: u32,
    ncolors: usize,
    cpp: usize,
}

impl Header {
    fn parse(line: &str) -> Result<Header, XpmError> {
        let invalid = || XpmError::InvalidHeader(line.into());

        let mut values = line
            .split_whitespace()
            .map(|v| v.parse::<u32>().map_err(|_| invalid()));

        let mut next = || values.next().unwrap_or_else(|| Err(invalid()));

        let header = Header {
            width: next()?,
            height: next()?,
            ncolors: next()? as usize,
            cpp: next()? as usize,
        };
        // hotspot and XPMEXT are allowed to follow, we don't use them

        if header.cpp == 0 {
            return Err(invalid());
        }

        Ok(header)
    }
}

/// Decodes the contents of an XPM file into a [`Pixmap`].
pub fn parse(data: &str) -> Result<Pixmap, XpmError> {
    let strings = quoted_strings(data);
    let mut strings = strings.iter().map(String::as_str);

    let header = Header::parse(strings.next().ok_or(XpmError::MissingHeader)?)?;
    trace!("parsed xpm header {:?}", header);

    // header sizes are untrusted
    let mut colors = HashMap::with_capacity(header.ncolors.min(MAX_PREALLOC));
    for found in 0..header.ncolors {
        let line = strings.next().ok_or(XpmError::MissingColors {
            expected: header.ncolors,
            found,
        })?;

        let (chars, value) = parse_color_entry(line, header.cpp)?;
        colors.insert(chars, value);
    }

    let (width, height) = (header.width as usize, header.height as usize);
    let rowlen = width
        .checked_mul(header.cpp)
        .ok_or_else(|| XpmError::InvalidHeader(format!("row of {} pixels is too long", width)))?;
    let mut pixels = Vec::with_capacity(width.saturating_mul(height).min(MAX_PREALLOC));

    for row in 0..height {
        let line = strings.next().ok_or(XpmError::MissingRows {
            expected: height,
            found: row,
        })?;

        let bytes = line.as_bytes();
        if bytes.len() < rowlen {
            return Err(XpmError::RowLength {
                row,
                expected: rowlen,
                got: bytes.len(),
            });
        }

        for chars in bytes[..rowlen].chunks(header.cpp) {
            match colors.get(chars) {
                Some(px) => pixels.push(*px),
                None => {
                    return Err(XpmError::UndefinedPixel {
                        row,
                        chars: String::from_utf8_lossy(chars).into_owned(),
                    })
                }
            }
        }
    }

    Ok(Pixmap::from_argb(header.width, header.height, pixels)?)
}

/// Extracts the contents of every double-quoted string outside comments.
fn quoted_strings(data: &str) -> Vec<String> {
    let mut strings = Vec::new();
    let mut chars = data.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            '"' => {
                let mut s = String::new();
                while let Some(c) = chars.next() {
                    match c {
                        '"' => break,
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                s.push(escaped);
                            }
                        }
                        c => s.push(c),
                    }
                }
                strings.push(s);
            }
            _ => {}
        }
    }

    strings
}

/// Parses one entry of the color table, returning the pixel characters
/// and the pixel value they stand for.
fn parse_color_entry(line: &str, cpp: usize) -> Result<(Vec<u8>, u32), XpmError> {
    let invalid = || XpmError::InvalidColor(line.into());

    let bytes = line.as_bytes();
    if bytes.len() < cpp {
        return Err(invalid());
    }
    let chars = bytes[..cpp].to_vec();
    let rest = line.get(cpp..).ok_or_else(invalid)?;

    // group the rest into (key, value) pairs, values may span several words
    let mut pairs: Vec<(&str, String)> = Vec::new();
    for word in rest.split_whitespace() {
        if ALL_KEYS.contains(&word) {
            pairs.push((word, String::new()));
        } else if let Some((_, value)) = pairs.last_mut() {
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(word);
        } else {
            return Err(invalid());
        }
    }

    let value = COLOR_KEYS
        .iter()
        .find_map(|key| {
            pairs
                .iter()
                .find(|(k, v)| k == key && !v.is_empty())
                .map(|(_, v)| v.as_str())
        })
        .ok_or_else(invalid)?;

    Ok((chars, parse_color(value)?))
}

/// Parses an X color specification into an `0xAARRGGBB` pixel.
fn parse_color(spec: &str) -> Result<u32, XpmError> {
    if spec.eq_ignore_ascii_case("none") {
        return Ok(TRANSPARENT);
    }

    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex_color(hex).ok_or_else(|| XpmError::InvalidColor(spec.into()));
    }

    let name: String = spec
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    named_color(&name)
        .map(|rgb| OPAQUE | rgb)
        .ok_or_else(|| XpmError::UnknownColor(spec.into()))
}

// #RGB, #RRGGBB, #RRRGGGBBB and #RRRRGGGGBBBB, keeping the top byte of each
fn parse_hex_color(hex: &str) -> Option<u32> {
    let len = hex.len();
    if !matches!(len, 3 | 6 | 9 | 12) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let digits = len / 3;
    let mut rgb = 0;
    for i in 0..3 {
        let component = u32::from_str_radix(&hex[i * digits..(i + 1) * digits], 16).ok()?;
        let byte = match digits {
            1 => component * 0x11,
            d => component >> ((d - 2) * 4),
        };
        rgb = (rgb << 8) | byte;
    }

    Some(OPAQUE | rgb)
}

fn named_color(name: &str) -> Option<u32> {
    Some(match name {
        "black" => 0x000000,
        "white" => 0xFFFFFF,
        "red" => 0xFF0000,
        "green" => 0x00FF00,
        "blue" => 0x0000FF,
        "yellow" => 0xFFFF00,
        "cyan" => 0x00FFFF,
        "magenta" => 0xFF00FF,
        "orange" => 0xFFA500,
        "gray" | "grey" => 0xBEBEBE,
        "darkgray" | "darkgrey" => 0xA9A9A9,
        "lightgray" | "lightgrey" => 0xD3D3D3,
        "gray50" | "grey50" => 0x7F7F7F,
        "navy" => 0x000080,
        "brown" => 0xA52A2A,
        _ => return None,
    })
}
