//! Diagnostic logging to a file.
//!
//! The chat UI owns the terminal, so log output can never go to stdout or
//! stderr while it runs. Logging is therefore opt-in: `--log <file>` installs
//! a `tracing` subscriber that appends to that file, filtered by
//! `CHATLINE_LOG` (same syntax as `RUST_LOG`, default `info`). Without a file
//! no subscriber is installed and every event is discarded.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "CHATLINE_LOG";
const DEFAULT_FILTER: &str = "info";

/// Installs the file subscriber when `log_file` is set. Returns `false` when
/// logging stays disabled.
pub fn init_logging(log_file: Option<&str>) -> io::Result<bool> {
    let Some(path) = log_file else {
        return Ok(false);
    };
    let file = open_log_file(Path::new(path))?;

    // A second init (tests, repeated calls) keeps the first subscriber.
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
