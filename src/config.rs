//! Configuration management for moviefinder
//!
//! Handles config file loading and API key resolution.
//! Config is stored at ~/.config/moviefinder/config.toml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::api::omdb::{DEFAULT_API_KEY, DEFAULT_BASE_URL};
use crate::api::{MetadataClient, OmdbClient};
use crate::retry::RetryPolicy;
use crate::session::SessionConfig;

/// Environment variable overriding the API key
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

/// Application configuration. Every field is optional; absent fields fall
/// back to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// OMDb API key
    pub api_key: Option<String>,
    /// Alternative OMDb endpoint
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Retries after the first attempt, for both search and details
    pub max_retries: Option<u32>,
    /// Wait between search retries
    pub search_backoff_ms: Option<u64>,
    /// Wait between detail retries
    pub detail_backoff_ms: Option<u64>,
    /// tracing filter directive (e.g. "debug", "moviefinder=trace")
    pub log_level: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/moviefinder/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("moviefinder").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit file; unlike `load`, errors are reported
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Get the API key with fallback chain:
    /// 1. Environment variable OMDB_API_KEY
    /// 2. Key from config file
    /// 3. Bundled key
    pub fn api_key(&self) -> String {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return key;
            }
        }
        self.resolved_api_key()
    }

    /// API key ignoring the environment
    fn resolved_api_key(&self) -> String {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_KEY.to_string())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(30))
    }

    /// Retry policies and validation settings for a session
    pub fn session_config(&self) -> SessionConfig {
        let defaults = SessionConfig::default();
        let policy = |base: RetryPolicy, backoff_ms: Option<u64>| RetryPolicy {
            max_retries: self.max_retries.unwrap_or(base.max_retries),
            backoff: backoff_ms.map(Duration::from_millis).unwrap_or(base.backoff),
        };

        SessionConfig {
            search_retry: policy(defaults.search_retry, self.search_backoff_ms),
            detail_retry: policy(defaults.detail_retry, self.detail_backoff_ms),
            ..defaults
        }
    }

    /// Build the metadata client described by this config
    pub fn client(&self) -> Arc<dyn MetadataClient> {
        Arc::new(OmdbClient::with_config(
            self.api_key(),
            self.base_url(),
            self.timeout(),
        ))
    }
}
