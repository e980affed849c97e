//! moviefinder - search the Open Movie Database from the terminal
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! moviefinder
//!
//! # CLI mode (for automation)
//! moviefinder search "blade runner"
//! moviefinder info tt0083658 --json
//! ```

use std::io::{stdout, Stdout};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use moviefinder::cli::{Cli, Command, ExitCode, Output};
use moviefinder::logging::{self, LogTarget};
use moviefinder::{commands, ui, App, Config, SearchSession};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        let config = Config::load();
        run_tui(config).await
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    let config = match cli.config {
        Some(ref path) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs),
        },
        None => Config::load(),
    };

    if let Err(e) = logging::init(LogTarget::Stderr, config.log_level.as_deref()) {
        return output.error(format!("{:#}", e), ExitCode::Error);
    }

    let session = SearchSession::with_config(config.client(), config.session_config());

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &session, &output).await,

        Some(Command::Info(cmd)) => commands::info_cmd(cmd, &session, &output).await,

        None => {
            // This shouldn't happen (handled by is_cli_mode check)
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: Config) -> Result<()> {
    // Logging to the terminal would corrupt the screen
    if let Some(target) = LogTarget::default_file() {
        logging::init(target, config.log_level.as_deref())?;
    }
    info!("starting TUI");

    let session = SearchSession::with_config(config.client(), config.session_config());
    let mut app = App::new(session);

    let mut terminal = init_terminal()?;

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    if let Err(ref e) = result {
        error!(error = %e, "TUI exited with error");
    }
    app.session.close();
    result
}

/// Main event loop - handles input, pulls session state, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running {
        // Session tasks publish in the background; take the latest snapshot
        app.sync();
        terminal.draw(|frame| ui::render(frame, app))?;

        // Blocking poll off the runtime threads so session tasks keep running
        let next = tokio::task::block_in_place(|| -> std::io::Result<Option<Event>> {
            if event::poll(TICK_RATE)? {
                event::read().map(Some)
            } else {
                Ok(None)
            }
        })?;

        if let Some(Event::Key(key)) = next {
            // Only handle key press events (ignore releases on Windows)
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }

    Ok(())
}
