//! Logging setup for the jobpoll binary.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is the binary's job, so embedding applications keep full control of
//! their own logging. `init` prefers a log file in the XDG state dir and
//! silently degrades to stderr when that file cannot be opened (read-only
//! home, missing state dir, ...), so logging never takes the CLI down.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,jobpoll=debug"))
}

fn log_file_in(state_home: &Path) -> PathBuf {
    state_home.join("jobpoll.log")
}

fn open_log_file() -> io::Result<(File, PathBuf)> {
    let dirs = xdg::BaseDirectories::with_prefix("jobpoll")
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let state_home = dirs.get_state_home();
    fs::create_dir_all(&state_home)?;

    let path = log_file_in(&state_home);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    Ok((file, path))
}

/// Install the global subscriber, writing to
/// `~/.local/state/jobpoll/jobpoll.log` when possible and to stderr
/// otherwise. `RUST_LOG` overrides the default `info,jobpoll=debug` filter.
pub fn init() {
    match open_log_file() {
        Ok((file, path)) => {
            tracing_subscriber::fmt()
                .with_env_filter(default_filter())
                .with_writer(BoxMakeWriter::new(Arc::new(file)))
                .with_ansi(false)
                .init();
            tracing::info!("logging to {}", path.display());
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(default_filter())
                .with_writer(io::stderr)
                .with_ansi(false)
                .init();
            tracing::warn!(error = %e, "cannot open log file, logging to stderr");
        }
    }
}
