//! Shared test utilities for the app module.
//!
//! - `create_test_app` / `create_test_app_with_backend` - `App` over an
//!   in-memory store with sequential ids and a fixed clock
//! - `reopen` - a second session over the same backend
//! - `render_app_to_terminal` / `buffer_text` - render to a `TestBackend`
//! - Key event helpers (`char_key`, `key`, `ctrl`, `alt`, `shift`)

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};

use crate::app::App;
use crate::core::Store;
use crate::core::model::{FixedClock, SequentialIds};
use crate::fs::MemoryStore;

/// The instant every test message is created at.
pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
}

/// Creates an `App` over a fresh in-memory store.
pub fn create_test_app() -> App {
    create_test_app_with_backend(&MemoryStore::new())
}

/// Creates an `App` sharing `backend`, so tests can inspect raw keys.
pub fn create_test_app_with_backend(backend: &MemoryStore) -> App {
    reopen(backend, "m")
}

/// Opens another session over `backend`.
///
/// Each session needs its own id prefix because sequential ids restart
/// at 1.
pub fn reopen(backend: &MemoryStore, id_prefix: &str) -> App {
    let store = Store::load(
        Box::new(backend.clone()),
        Box::new(SequentialIds::new(id_prefix)),
        Box::new(FixedClock(test_time())),
    );
    App::new_with_store(store)
}

/// Creates a [`KeyEvent`] with the given code and modifiers.
pub fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

/// Creates a [`KeyEvent`] with no modifiers.
pub fn key(code: KeyCode) -> KeyEvent {
    key_with(code, KeyModifiers::NONE)
}

pub fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

pub fn ctrl(code: KeyCode) -> KeyEvent {
    key_with(code, KeyModifiers::CONTROL)
}

pub fn alt(code: KeyCode) -> KeyEvent {
    key_with(code, KeyModifiers::ALT)
}

pub fn shift(code: KeyCode) -> KeyEvent {
    key_with(code, KeyModifiers::SHIFT)
}

/// Types `text` key by key. Newlines are sent as Shift+Enter.
pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        if c == '\n' {
            app.handle_key(shift(KeyCode::Enter));
        } else {
            app.handle_key(char_key(c));
        }
    }
}

/// Types `text` and sends it with Ctrl+S.
pub fn submit(app: &mut App, text: &str) {
    type_text(app, text);
    app.handle_key(ctrl(KeyCode::Char('s')));
}

/// Sends a message and returns the id it was stored under.
pub fn post(app: &mut App, text: &str) -> String {
    submit(app, text);
    app.store()
        .last_added_message_id()
        .map(ToString::to_string)
        .expect("message should have been created")
}

/// Renders the app into a `width` x `height` test terminal.
pub fn render_app_to_terminal(
    app: &mut App,
    width: u16,
    height: u16,
) -> Result<Terminal<TestBackend>> {
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    app.update_layout(ratatui::layout::Rect::new(0, 0, width, height));
    terminal.draw(|frame| app.render(frame))?;
    Ok(terminal)
}

/// The rendered buffer as one string per row.
pub fn buffer_lines(terminal: &Terminal<TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect()
        })
        .collect()
}

/// The rendered buffer joined into a single string.
pub fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    buffer_lines(terminal).join("\n")
}
