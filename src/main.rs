mod config;
mod controller;
mod error;
mod events;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use config::AppConfig;
use controller::{handle_key_event, AppController};
use events::{Command, CommandSender, EventReceiver};
use model::{ItunesClient, MediaStore, UiState};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== MiTunes Starting ===");

    let config = AppConfig::from_env()?;
    config.log();

    let store = MediaStore::open(&config.store_path).await?;
    tracing::info!(records = store.count().await, "Media store ready");
    let catalog = ItunesClient::new(&config.base_url, config.request_timeout, config.retry_attempts)?;

    let (event_tx, event_rx) = events::channel();
    let (command_tx, command_rx) = events::command_channel();

    let controller = AppController::new(config, store.clone(), Arc::new(catalog), event_tx);
    let coordinator = tokio::spawn(controller.clone().run(command_rx));
    command_tx.send(Command::Preload)?;

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, event_rx, command_tx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    controller.shutdown();
    coordinator.abort();

    if store.has_changes().await {
        tracing::debug!("Saving pending store changes");
        if let Err(e) = store.save().await {
            tracing::error!(error = %e, "Failed to save media store on exit");
        }
    }

    tracing::info!("MiTunes shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut events: EventReceiver,
    commands: CommandSender,
) -> io::Result<()> {
    let mut ui_state = UiState::default();

    loop {
        // Apply everything the controller produced since the last frame
        while let Ok(event) = events.try_recv() {
            ui_state.apply(event);
        }

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &ui_state);
        })?;

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = handle_key_event(key, &mut ui_state) {
                    if commands.send(command).is_err() {
                        tracing::warn!("Controller stopped, leaving UI loop");
                        break;
                    }
                }
            }
        }

        if ui_state.should_quit {
            break;
        }
    }

    Ok(())
}
