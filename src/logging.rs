//! Tracing setup.
//!
//! The TUI owns stdout, so the formatter writes to a file in the config
//! directory. With logging disabled no subscriber is installed and every
//! `tracing` macro is a no-op.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LoggingConfig};

/// Installs the global subscriber. Returns the log file path if one was opened.
pub fn init(logging: &LoggingConfig) -> Result<Option<PathBuf>> {
    if !logging.enabled {
        return Ok(None);
    }

    let path = Config::log_file_path()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .context(format!("Failed to create log directory: {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .context(format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context(format!("Invalid log level: {}", logging.level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(path = %path.display(), "logging initialised");
    Ok(Some(path))
}
