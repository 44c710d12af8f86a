//! user-dashboard binary entry point.
//!
//! Parses the command line, sets up tracing, initializes the terminal in raw
//! mode, runs the TUI event loop, and restores the terminal state on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use user_dashboard::Result;
use user_dashboard::app::{self, AppState, keymap::Keymap, theme};
use user_dashboard::config::Cli;
use user_dashboard::logging::init_tracing;
use user_dashboard::source::source_from_location;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(&cli.log_level, &cli.log_path()) {
        eprintln!("logging disabled: {e}");
    }

    let source = source_from_location(&cli.source).map_err(|e| format!("source: {e}"))?;
    tracing::info!(source = %source.describe(), page_size = cli.page_size, "starting");
    let theme = theme::ThemeStore::load(cli.theme_path(), theme::os_prefers_dark());
    let keymap = Keymap::load_or_init(&cli.keybinds_path());
    let mut app = AppState::new(source, Some(theme), keymap).with_page_size(cli.page_size);

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
