//! t2s main entry point
//!
//! The event loop watches stdin for commands and wakes on a short timeout
//! so that voice discovery and playback completion are observed even while
//! the user types nothing.

use log::{debug, error, info};
use mio::{Events, Interest, Poll, Token};
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;
use std::process;
use std::time::Instant;
use t2s::app::{Action, App};
use t2s::speech::POLL_INTERVAL;
use t2s::Result;

/// Token for stdin in mio poll
const STDIN: Token = Token(0);

fn main() {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let debug_mode = args.iter().any(|arg| arg == "--debug" || arg == "-d");

    // Initialize logger
    if debug_mode {
        // Debug mode: write to t2s.log file
        use std::fs::OpenOptions;
        match OpenOptions::new().create(true).append(true).open("t2s.log") {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open t2s.log for debug logging: {}", e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "t2s version {} starting (debug mode, logging to t2s.log)",
            t2s::VERSION
        );
    } else {
        // Normal mode: minimal logging to stderr, only errors
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }

    // Run the application
    if let Err(e) = run() {
        error!("Fatal error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    debug!("Initializing t2s");

    let mut app = App::new(Instant::now())?;

    println!("t2s {} - text to speech", t2s::VERSION);
    println!("Configuration: {}", app.config.path().display());
    println!("Type text, then :speak to hear it (:help for commands)");

    // Set up event loop
    let mut stdin = io::stdin();
    let stdin_fd = stdin.as_raw_fd();

    let mut poll = Poll::new()?;
    let mut stdin_source = mio::unix::SourceFd(&stdin_fd);
    poll.registry()
        .register(&mut stdin_source, STDIN, Interest::READABLE)?;
    let mut events = Events::with_capacity(8);

    // Bytes read from stdin that do not yet form a full line
    let mut pending: Vec<u8> = Vec::new();

    info!("t2s ready - entering event loop");

    loop {
        // The poll timeout doubles as the cooperative tick: voice
        // discovery and playback completion are checked every interval
        app.tick(Instant::now());

        if let Err(e) = poll.poll(&mut events, Some(POLL_INTERVAL)) {
            if e.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(e.into());
        }

        for event in events.iter() {
            if event.token() != STDIN {
                continue;
            }

            let mut buf = [0u8; 4096];
            let n = stdin.read(&mut buf)?;
            if n == 0 {
                // stdin closed (piped input finished, or Ctrl+D)
                info!("stdin closed, shutting down");
                if !pending.is_empty() {
                    let line = String::from_utf8_lossy(&pending).to_string();
                    if app.handle_line(&line) == Action::Quit {
                        return Ok(());
                    }
                }
                app.handle_line(":quit");
                return Ok(());
            }

            pending.extend_from_slice(&buf[..n]);
            while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
                let raw: Vec<u8> = pending.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&raw).to_string();
                if app.handle_line(&line) == Action::Quit {
                    return Ok(());
                }
            }
        }
    }
}
