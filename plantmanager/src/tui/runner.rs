//! TUI entry point and event loop
//!
//! Draws the current screen, delivers fired reminders to the app and
//! forwards key presses until the user quits.

use super::app::App;
use super::render;
use crate::config::UI_POLL_INTERVAL_MS;
use crate::services::scheduler::FiredNotification;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the plant screens until the user quits
pub async fn run(
    mut app: App,
    mut fired_rx: mpsc::UnboundedReceiver<FiredNotification>,
) -> anyhow::Result<()> {
    let mut term = ratatui::init();

    let result = run_loop(&mut term, &mut app, &mut fired_rx).await;

    ratatui::restore();
    result
}

async fn run_loop(
    term: &mut ratatui::DefaultTerminal,
    app: &mut App,
    fired_rx: &mut mpsc::UnboundedReceiver<FiredNotification>,
) -> anyhow::Result<()> {
    while !app.should_quit {
        draw_and_load(term, app).await?;

        while let Ok(fired) = fired_rx.try_recv() {
            app.on_reminder(fired).await;
        }

        if event::poll(Duration::from_millis(UI_POLL_INTERVAL_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    tracing::debug!("Key event: code={:?}, modifiers={:?}", key.code, key.modifiers);
                    app.handle_key(key).await;
                }
                _ => {}
            }
        }
    }

    tracing::info!("Leaving plant screens");
    Ok(())
}

/// Draw one frame; a pending load runs after the loading view is shown
async fn draw_and_load<B: Backend>(term: &mut Terminal<B>, app: &mut App) -> std::io::Result<()> {
    term.draw(|frame| render::view(frame, app))?;

    if app.loading {
        app.load().await;
        term.draw(|frame| render::view(frame, app))?;
    }
    Ok(())
}
