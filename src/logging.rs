//! tracing subscriber setup
//!
//! CLI mode logs to stderr. The TUI owns the terminal, so it logs to
//! ~/.local/share/moviefinder/moviefinder.log instead.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "warn";

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// Default log file for TUI mode
    pub fn default_file() -> Option<Self> {
        dirs::data_dir().map(|d| LogTarget::File(d.join("moviefinder").join("moviefinder.log")))
    }
}

/// Filter from RUST_LOG, else the configured level, else "warn"
pub fn filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_LEVEL)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(target: LogTarget, configured: Option<&str>) -> Result<()> {
    let filter = filter(configured);

    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Could not create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Could not open log file {}", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_configured_level() {
        // Only meaningful when RUST_LOG is unset, which is the case under cargo test
        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(filter(Some("debug")).to_string(), "debug");
            assert_eq!(filter(None).to_string(), DEFAULT_LEVEL);
        }
    }

    #[test]
    fn test_default_file_target() {
        if let Some(LogTarget::File(path)) = LogTarget::default_file() {
            assert!(path.ends_with("moviefinder/moviefinder.log"));
        }
    }
}
