//! Logging configuration and initialization.
//!
//! The library only emits `tracing` events. Hosts that run imports call
//! [`init_logging`] once at startup; `RUST_LOG` overrides the verbosity
//! mapping below.
//!
//! Importer events (skipped records, per-comment save failures, the
//! per-site summary) live under `remark_import::migrator`. Storage events
//! (database open, site wipes) live under `remark_import::storage` and stay
//! one step quieter until the highest verbosity.

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::{Mutex, Once};

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const MIGRATOR_TARGET: &str = "remark_import::migrator";
const STORAGE_TARGET: &str = "remark_import::storage";

/// Install the global subscriber for an import run.
///
/// Events go to stderr. With `log_file`, they are also appended to that file
/// as JSON lines, so successive runs against one site accumulate a single
/// audit trail. Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed.
pub fn init_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbosity, quiet)))?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 0)
        .with_file(cfg!(debug_assertions))
        .with_line_number(cfg!(debug_assertions))
        .with_ansi(std::io::stderr().is_terminal());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            let json_layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .json();
            tracing::subscriber::set_global_default(subscriber.with(json_layer))?;
        }
        None => tracing::subscriber::set_global_default(subscriber)?,
    }

    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

fn default_filter(verbosity: u8, quiet: bool) -> String {
    if quiet {
        return "error".to_string();
    }

    let (migrator, storage) = match verbosity {
        0 => {
            if cfg!(debug_assertions) {
                ("info", "warn")
            } else {
                ("warn", "warn")
            }
        }
        1 => ("info", "warn"),
        2 => ("debug", "info"),
        3 => ("debug", "debug"),
        _ => ("trace", "trace"),
    };

    let mut filter =
        format!("remark_import=warn,{MIGRATOR_TARGET}={migrator},{STORAGE_TARGET}={storage}");
    if verbosity >= 3 {
        filter.push_str(&format!(",rusqlite={storage}"));
    }
    filter
}

/// Route crate events at debug level to the test harness writer.
pub fn init_test_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("remark_import=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}
