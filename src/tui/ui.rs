use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use crate::app::{spawn_load, LoadOutcome};
use crate::directory::SheetSource;
use crate::tui::app::{App, KeyOutcome};
use crate::tui::render::render_ui;

/// Run the terminal UI
pub async fn run_ui(mut app: App, source: Arc<dyn SheetSource>, tick_rate: Duration) -> Result<()> {
    // Check if we have an interactive terminal
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("❌ dataguru needs an interactive terminal for the dashboard.");
        eprintln!("   Use `dataguru list` or `dataguru stats` with pipes and redirects.");
        return Err(anyhow::anyhow!("No interactive terminal available"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.clear()?;

    // Finished loads come back on this channel
    let (tx, mut rx) = mpsc::channel::<LoadOutcome>(8);

    let ticket = app.begin_load();
    spawn_load(Arc::clone(&source), ticket, tx.clone());

    let res = run_app(&mut terminal, &mut app, &source, tick_rate, tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    source: &Arc<dyn SheetSource>,
    tick_rate: Duration,
    tx: mpsc::Sender<LoadOutcome>,
    rx: &mut mpsc::Receiver<LoadOutcome>,
) -> Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        while let Ok(outcome) = rx.try_recv() {
            app.apply_load(outcome);
        }

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.handle_key(key) {
                    KeyOutcome::Reload => {
                        let ticket = app.begin_load();
                        info!("Reloading from {} (load #{})", source.location(), ticket);
                        spawn_load(Arc::clone(source), ticket, tx.clone());
                    }
                    KeyOutcome::Quit => break,
                    KeyOutcome::None => {}
                }
            }
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}
