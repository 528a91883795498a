//! caltrack TUI
//!
//! Terminal user interface for tracking calories.
//!
//! ## Layout
//!
//! - Top: Add/Edit form (meal name, calories)
//! - Middle: Total calories
//! - Bottom: Item list
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - Enter or e: Edit the selected item
//! - a: Add an item
//! - C: Clear all items
//! - ?: Help
//! - q: Quit

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use caltrack_core::{Config, Coordinator, FileSlots, Intent, IntentError, ItemPersistence};
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::App;

type TuiCoordinator = Coordinator<App, FileSlots>;

/// Run the TUI application
pub fn run(config: &Config) -> Result<()> {
    // File-based logging, only if CALTRACK_LOG is set
    init_tui_logging(config);

    let persistence = ItemPersistence::new(config.items_slots());
    let mut coordinator = Coordinator::new(persistence, App::new());
    coordinator.start();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_app(&mut terminal, &mut coordinator);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    coordinator: &mut TuiCoordinator,
) -> Result<()> {
    loop {
        coordinator.renderer_mut().check_status_timeout();

        terminal.draw(|frame| ui::draw(frame, coordinator.renderer()))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };

        // Only handle key press events (not release)
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let app = coordinator.renderer_mut();

        // If error modal is showing, any key dismisses it
        if app.has_error() {
            app.clear_error();
            continue;
        }

        // If help is showing, any key dismisses it
        if app.show_help {
            app.show_help = false;
            continue;
        }

        if let Some(intent) = app.on_key(key.code, key.modifiers) {
            handle_intent(coordinator, intent);
        }

        if coordinator.renderer().should_quit {
            info!("Quitting TUI");
            break;
        }
    }

    Ok(())
}

/// Dispatch an intent and report the outcome in the status bar
fn handle_intent(coordinator: &mut TuiCoordinator, intent: Intent) {
    let done = match &intent {
        Intent::SubmitNew(_) => Some("Item added"),
        Intent::SubmitUpdate(_) => Some("Item updated"),
        Intent::RequestDelete => Some("Item deleted"),
        Intent::RequestClear => Some("All items cleared"),
        Intent::RequestEdit(_) | Intent::CancelEdit => None,
    };

    match coordinator.dispatch(intent) {
        Ok(()) => {
            if let Some(msg) = done {
                coordinator.renderer_mut().set_status(msg);
            }
        }
        Err(IntentError::Rejected(e)) => {
            coordinator.renderer_mut().set_status(e.to_string());
        }
        Err(IntentError::Store(e)) => {
            warn!(error = %e, "Change refused");
            coordinator.renderer_mut().set_error(e.to_string());
        }
        Err(IntentError::Storage(e)) => {
            warn!(error = %e, "Change not saved");
            let msg = match e.recovery_suggestion() {
                Some(hint) => format!("Change not saved: {}\n{}", e, hint),
                None => format!("Change not saved: {}", e),
            };
            coordinator.renderer_mut().set_error(msg);
        }
    }
}

/// Initialize file-based logging for the TUI
fn init_tui_logging(config: &Config) {
    // Only log if CALTRACK_LOG is set
    let Ok(log_level) = std::env::var("CALTRACK_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "caltrack_core={},caltrack_cli={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
