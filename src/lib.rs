//! moviefinder - search the Open Movie Database from the terminal
//!
//! The core is [`SearchSession`]: the state behind one search screen,
//! with retrying lookups against a pluggable [`MetadataClient`].
//!
//! # Modules
//!
//! - `models` - Search results and detail records
//! - `api` - Metadata client trait, error classification, OMDb client
//! - `retry` - Bounded retry with fixed backoff for transport failures
//! - `messages` - User-facing message catalogue
//! - `session` - Search session state and operations
//! - `config` / `logging` - Config file and tracing setup
//! - `cli` / `commands` - Scriptable subcommands
//! - `app` / `ui` - Interactive TUI

pub mod models;
pub mod api;
pub mod retry;
pub mod messages;
pub mod session;
pub mod config;
pub mod logging;
pub mod cli;
pub mod commands;
pub mod app;
pub mod ui;

// Re-export commonly used types
pub use models::{DetailRecord, MediaType, SearchPage, SearchResultItem};

pub use api::{LookupError, MetadataClient, OmdbClient, TransportKind};
pub use app::{App, InputMode};
pub use config::Config;
pub use retry::{RetryError, RetryPolicy};
pub use session::{Phase, SearchSession, SessionConfig, SessionState, View};
