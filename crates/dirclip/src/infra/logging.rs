//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so events go to a log file instead of stderr.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing::level_filters::LevelFilter;

use crate::infra::config::Logging;

/// Install the global subscriber. Returns the log file in use, or `None` when logging is off.
pub fn init(settings: &Logging) -> Result<Option<PathBuf>> {
    let level: LevelFilter = settings
        .level()
        .parse()
        .map_err(|err| anyhow!("invalid log level '{}': {err}", settings.level()))?;
    if level == LevelFilter::OFF {
        return Ok(None);
    }

    let path = settings
        .file()
        .or_else(default_log_path)
        .context("no location available for the log file")?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    tracing::debug!(path = %path.display(), "logging initialised");
    Ok(Some(path))
}

fn default_log_path() -> Option<PathBuf> {
    dirs_next::cache_dir().map(|base| base.join("dirclip/dirclip.log"))
}
