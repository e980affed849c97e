//! CLI - Command Line Interface for moviefinder
//!
//! Every lookup the TUI can do is scriptable. Output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! moviefinder search "blade runner" --json
//! moviefinder search alien -t movie -l 5
//! moviefinder info tt0083658
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::MediaType;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Lookup failed (no results, rejected, network)
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// moviefinder - search the Open Movie Database by title
///
/// Run without arguments to launch the interactive TUI.
/// Use subcommands for scriptable lookups.
#[derive(Parser, Debug)]
#[command(
    name = "moviefinder",
    version,
    about = "Search the Open Movie Database by title",
    long_about = "Search OMDb by title and view details.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  moviefinder                         Launch interactive TUI\n\
                  moviefinder search \"blade runner\"   Search for titles\n\
                  moviefinder info tt0083658 --json   Show details as JSON"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search titles
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Show details for an IMDb id
    #[command(visible_alias = "i")]
    Info(InfoCmd),
}

/// Search titles by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "10")]
    pub limit: usize,

    /// Filter by media type
    #[arg(long = "type", short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,
}

/// Media type filter for search
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTypeFilter {
    Movie,
    Series,
    Episode,
    Game,
}

impl MediaTypeFilter {
    pub fn matches(&self, media_type: Option<MediaType>) -> bool {
        let wanted = match self {
            MediaTypeFilter::Movie => MediaType::Movie,
            MediaTypeFilter::Series => MediaType::Series,
            MediaTypeFilter::Episode => MediaType::Episode,
            MediaTypeFilter::Game => MediaType::Game,
        };
        media_type == Some(wanted)
    }
}

/// Get detailed information about a title
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// IMDb id (e.g., tt0083658)
    #[arg(required = true)]
    pub imdb_id: String,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data: JSON envelope in JSON mode, `text` otherwise
    pub fn print<T: Serialize>(&self, data: T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// IMDb ID Validation
// =============================================================================

/// Validate IMDb id format (tt followed by 7+ digits)
pub fn validate_imdb_id(id: &str) -> Result<&str, &'static str> {
    if id.starts_with("tt") && id.len() >= 9 && id[2..].chars().all(|c| c.is_ascii_digit()) {
        Ok(id)
    } else {
        Err("Invalid IMDb id format (expected tt followed by 7+ digits)")
    }
}

// =============================================================================
// Tests
// =============================================================================
