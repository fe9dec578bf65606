//! Command line handling for the `iconify` binary.
//!
//! Options follow the usual single-letter getopt style: flags can be
//! grouped (`-th`), option arguments can be attached (`-b2`) or
//! separate (`-b 2`), and `--` ends option parsing.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::IconConfig;
use crate::core::types::Color;
use crate::x::{XWindowID, Xid};

/// An error parsing the command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// An option that is not known.
    #[error("unknown option -{0}")]
    UnknownOption(char),
    /// An option that needs an argument was last on the line.
    #[error("option -{0} needs an argument")]
    MissingArgument(char),
    /// No window id was given.
    #[error("no window id given")]
    MissingWindow,
    /// More than one positional argument was given.
    #[error("unexpected argument {0:?}")]
    UnexpectedArgument(String),
    /// A numeric option argument that does not parse.
    #[error("invalid number {value:?} for -{option}")]
    InvalidNumber {
        /// The option.
        option: char,
        /// What was given.
        value: String,
    },
    /// A color that does not parse.
    #[error("invalid color {0:?}")]
    InvalidColor(String),
    /// A window id that does not parse, or is zero.
    #[error("invalid window id {0:?}")]
    InvalidWindow(String),
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the help text and exit.
    Help,
    /// Iconify a window.
    Iconify(Options),
}

/// The options for iconifying a window.
///
/// Anything left unset keeps its default from [`IconConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// The window to iconify.
    pub window: XWindowID,
    /// The caption, `-n`.
    pub name: Option<String>,
    /// The icon file, `-i`.
    pub icon: Option<PathBuf>,
    /// The image width, `-W` or `-s`.
    pub width: Option<u32>,
    /// The image height, `-H` or `-s`.
    pub height: Option<u32>,
    /// The border width, `-b`.
    pub border: Option<u32>,
    /// The caption background color, `-B`.
    pub caption_bg: Option<Color>,
    /// The caption text color, `-F`.
    pub caption_fg: Option<Color>,
    /// The frame color, `-f`.
    pub frame: Option<Color>,
    /// Whether to show the caption, cleared by `-t`.
    pub show_caption: bool,
}

impl Options {
    fn new(window: XWindowID) -> Self {
        Self {
            window,
            name: None,
            icon: None,
            width: None,
            height: None,
            border: None,
            caption_bg: None,
            caption_fg: None,
            frame: None,
            show_caption: true,
        }
    }

    /// Builds the icon configuration these options describe.
    pub fn config(&self) -> crate::Result<IconConfig> {
        let mut builder = IconConfig::builder().show_caption(self.show_caption);

        if let Some(width) = self.width {
            builder = builder.width(width);
        }
        if let Some(height) = self.height {
            builder = builder.height(height);
        }
        if let Some(border) = self.border {
            builder = builder.border(border);
        }
        if let Some(color) = self.caption_bg {
            builder = builder.caption_bg(color);
        }
        if let Some(color) = self.caption_fg {
            builder = builder.caption_fg(color);
        }
        if let Some(color) = self.frame {
            builder = builder.frame(color);
        }

        builder.finish()
    }
}

/// The help text.
pub fn usage(program: &str) -> String {
    format!(
        "Usage: {} [<options>] <window_id>
Options:
   -h          This help
   -t          Disable text caption
   -n <name>   Name to show below the icon
   -i <icon>   Path to the icon pixmap (xpm)
   -W <width>  Icon width in pixels
   -H <height> Icon height in pixels
   -s <dim>    Icon width and height in pixels
   -B <bg>     Text background color
   -F <fg>     Text foreground color
   -f <fc>     Frame color when border is active
   -b <border> Border width in pixels, or 0 for none
",
        program
    )
}

// options that take an argument
const WITH_ARGUMENT: &[char] = &['n', 'i', 'W', 'H', 's', 'B', 'F', 'f', 'b'];

/// Parses the command line, not including the program name.
pub fn parse_args<I, S>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut flags: Vec<(char, Option<String>)> = Vec::new();
    let mut positional: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--" {
            positional.extend(args.by_ref());
            break;
        }
        let Some(group) = arg.strip_prefix('-').filter(|g| !g.is_empty()) else {
            positional.push(arg);
            continue;
        };

        for (idx, opt) in group.char_indices() {
            if !WITH_ARGUMENT.contains(&opt) {
                flags.push((opt, None));
                continue;
            }
            let rest = &group[idx + opt.len_utf8()..];
            let value = if rest.is_empty() {
                args.next().ok_or(CliError::MissingArgument(opt))?
            } else {
                rest.to_string()
            };
            flags.push((opt, Some(value)));
            break;
        }
    }

    // help wins over everything else, like it does with getopt
    let mut help = false;
    let mut opts = Options::new(Xid::zero());
    for (opt, value) in flags {
        let value = value.unwrap_or_default();
        match opt {
            'h' => help = true,
            't' => opts.show_caption = false,
            'n' => opts.name = Some(value),
            'i' => opts.icon = Some(PathBuf::from(value)),
            'W' => opts.width = Some(parse_number(opt, &value)?),
            'H' => opts.height = Some(parse_number(opt, &value)?),
            's' => {
                let dim = parse_number(opt, &value)?;
                opts.width = Some(dim);
                opts.height = Some(dim);
            }
            'B' => opts.caption_bg = Some(parse_color(&value)?),
            'F' => opts.caption_fg = Some(parse_color(&value)?),
            'f' => opts.frame = Some(parse_color(&value)?),
            'b' => opts.border = Some(parse_number(opt, &value)?),
            other => return Err(CliError::UnknownOption(other)),
        }
    }

    if help {
        return Ok(Command::Help);
    }

    let mut positional = positional.into_iter();
    let window = positional.next().ok_or(CliError::MissingWindow)?;
    if let Some(extra) = positional.next() {
        return Err(CliError::UnexpectedArgument(extra));
    }
    opts.window = parse_window_id(&window)?;

    Ok(Command::Iconify(opts))
}

fn parse_number(option: char, value: &str) -> Result<u32, CliError> {
    value.trim().parse().map_err(|_| CliError::InvalidNumber {
        option,
        value: value.into(),
    })
}

/// Parses a hexadecimal RGB color such as `ff8800`, `#ff8800` or
/// `0xff8800`.
pub fn parse_color(s: &str) -> Result<Color, CliError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    match u32::from_str_radix(digits, 16) {
        Ok(hex) if hex <= 0xFFFFFF && !digits.starts_with('+') => Ok(Color::from_hex(hex)),
        _ => Err(CliError::InvalidColor(s.into())),
    }
}

/// Parses a window id in decimal, `0x` hexadecimal or `0` octal.
///
/// Zero is not a window and is rejected.
pub fn parse_window_id(s: &str) -> Result<XWindowID, CliError> {
    let trimmed = s.trim();
    let parsed = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)
    } else if trimmed.len() > 1 && trimmed.starts_with('0') {
        u32::from_str_radix(&trimmed[1..], 8)
    } else {
        trimmed.parse()
    };

    match parsed {
        Ok(0) | Err(_) => Err(CliError::InvalidWindow(s.into())),
        Ok(id) => Ok(Xid(id)),
    }
}
