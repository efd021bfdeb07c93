//! Tracing setup for the `resq` binary.
//!
//! Events go to `$XDG_STATE_HOME/resq/resq.log` when that file can be opened,
//! otherwise to stderr. `RUST_LOG` overrides the default filter.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,resq=debug,resq_core=debug";

/// Filter from `RUST_LOG`, or [`DEFAULT_FILTER`] when unset or unparsable.
fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Location of the log file; creates the state directory if needed.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("resq")?;
    dirs.place_state_file("resq.log")
        .context("create resq state directory")
}

/// Append plain-text events to [`log_file_path`]. Returns the path on success;
/// on error nothing is installed and the caller may use [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    // `&File` is `Write`, so a shared handle serves every event without cloning fds.
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {}", e))?;

    tracing::info!(path = %path.display(), "resq logging initialized");
    Ok(path)
}

/// Plain-text events on stderr. A no-op if a subscriber is already installed.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(DEFAULT_FILTER.parse::<EnvFilter>().is_ok());
    }
}
