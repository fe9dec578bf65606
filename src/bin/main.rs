//! The `iconify` command.
//!
//! Turns the window given on the command line into a desktop icon,
//! and stays around until the icon is dismissed.

use std::env;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{fmt as logger, fmt::format::FmtSpan, EnvFilter};

use iconify::cli::{self, Command, Options};
use iconify::icon::load_icon;
use iconify::x::X11RBConn;
use iconify::{Dismissal, IconState};

// environment variable holding the log filter
const LOG_ENV: &str = "ICONIFY_LOG";

fn iconify(opts: Options) -> iconify::Result<Dismissal> {
    let config = opts.config()?;

    //* 1: connect to the X server
    let conn = X11RBConn::new()?;

    //* 2: find the artwork and set up the icon
    let source = load_icon(&conn, opts.icon.as_deref(), opts.window, &config)?;
    let mut icon = IconState::new(&conn, opts.window, source, opts.name, opts.icon, config)?;

    //* 3: show it and wait until it goes away
    icon.create()?;
    let dismissal = icon.run()?;
    icon.destroy()?;

    Ok(dismissal)
}

pub fn main() -> ExitCode {
    // set up the logger
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let logged = logger::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        // only log enter and exit
        .with_span_events(FmtSpan::ACTIVE)
        // don't use timestamps
        .without_time()
        // don't show source filename
        .with_file(false)
        // don't show source code line
        .with_line_number(false)
        // register as global
        .try_init();
    if let Err(e) = logged {
        eprintln!("could not set up logging: {}", e);
    }

    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "iconify".into());

    let opts = match cli::parse_args(args) {
        Ok(Command::Help) => {
            print!("{}", cli::usage(&program));
            return ExitCode::SUCCESS;
        }
        Ok(Command::Iconify(opts)) => opts,
        Err(e) => {
            eprintln!("{}: {}", program, e);
            eprint!("{}", cli::usage(&program));
            return ExitCode::FAILURE;
        }
    };

    match iconify(opts) {
        Ok(dismissal) => {
            info!("icon dismissed: {:?}", dismissal);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
