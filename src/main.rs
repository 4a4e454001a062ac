//! `io-notes` - terminal notebook.
//!
//! Entry point for the application.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use ratatui::crossterm::event::{self, Event, KeyEventKind};

use io_notes::app::App;
use io_notes::cli::Args;
use io_notes::fs::DataPaths;
use io_notes::logging;
use io_notes::tui::TerminalEventGuard;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let paths = args.data_paths()?;
    logging::init(&args.log_path(&paths))?;
    tracing::info!(data_dir = %paths.base().display(), "starting");

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &paths);
    ratatui::restore();

    if let Err(e) = &result {
        tracing::error!(error = %e, "exited with error");
    }
    result
}

fn run_app(terminal: &mut ratatui::DefaultTerminal, paths: &DataPaths) -> Result<()> {
    // Must come after ratatui::init, which resets terminal flags.
    let _event_guard = TerminalEventGuard::new();

    let mut app = App::new(paths)?;

    loop {
        // Layout is computed inside draw so it matches the rendered area.
        terminal.draw(|frame| {
            app.update_layout(frame.area());
            app.render(frame);
        })?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Paste(text) => {
                    tracing::trace!(len = text.len(), lines = text.lines().count(), "paste");
                    app.handle_paste(&text);
                }
                _ => {}
            }
        }

        app.process_events();
        app.tick();

        if app.should_quit() {
            break;
        }
    }

    tracing::info!("shutting down");
    Ok(())
}
