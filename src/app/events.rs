//! Key and paste handling for the App.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::App;
use crate::editor::{InlineFormat, ListKind};

/// Env var that turns on per-key debug events in the log.
const DEBUG_KEYS_ENV: &str = "IO_NOTES_DEBUG_KEYS";

impl App {
    /// Handles pasted text from bracketed paste mode.
    ///
    /// Line endings are normalised and control characters other than
    /// newlines and tabs dropped before the text reaches the editor.
    pub fn handle_paste(&mut self, text: &str) {
        if text.is_empty() || self.show_help {
            return;
        }
        let filtered: String = text
            .chars()
            .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
            .collect();
        self.paste_into_composer(&filtered);
    }

    /// Handles a key event.
    ///
    /// Order of precedence: quit, help overlay, command popup, global
    /// shortcuts (submit, selection, message actions, scrolling), then the
    /// composer.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if std::env::var_os(DEBUG_KEYS_ENV).is_some() {
            tracing::debug!(code = ?key.code, modifiers = ?key.modifiers, kind = ?key.kind, "key");
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        if self.command_popup_visible() && self.handle_command_popup_key(key) {
            return;
        }

        if ctrl && self.handle_ctrl_key(key.code) {
            return;
        }
        if alt && self.handle_alt_key(key.code) {
            return;
        }

        match key.code {
            KeyCode::PageUp => self.scroll_page_up(),
            KeyCode::PageDown => self.scroll_page_down(),
            KeyCode::Esc => self.handle_escape(),
            _ => self.handle_composer_key(key),
        }
    }

    /// Returns true if the popup consumed the key.
    fn handle_command_popup_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => self.composer.command_popup_state.select_up(),
            KeyCode::Down => self.composer.command_popup_state.select_down(),
            KeyCode::Tab => self.complete_command_from_popup(),
            KeyCode::Enter if key.modifiers.is_empty() => {
                self.complete_command_from_popup();
                self.submit_composer();
            }
            KeyCode::Esc => self.dismiss_command_popup(),
            _ => return false,
        }
        true
    }

    fn handle_ctrl_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Enter | KeyCode::Char('s' | 'd') => self.submit_composer(),
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            KeyCode::Char('b') => self.composer.editor.toggle_format(InlineFormat::Bold),
            KeyCode::Char('e') => self.composer.editor.toggle_format(InlineFormat::Italic),
            KeyCode::Char('u') => self.composer.editor.toggle_format(InlineFormat::Underline),
            KeyCode::Char('x') => self
                .composer
                .editor
                .toggle_format(InlineFormat::Strikethrough),
            KeyCode::Char('l') => self.composer.editor.toggle_list(ListKind::Bullet),
            KeyCode::Char('n') => self.composer.editor.toggle_list(ListKind::Number),
            KeyCode::Char('z') => {
                self.composer.editor.undo();
            }
            KeyCode::Char('y') => {
                self.composer.editor.redo();
            }
            KeyCode::Char('a') => self.composer.editor.select_all(),
            _ => return false,
        }
        self.update_slash_command_popup();
        true
    }

    fn handle_alt_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Enter => {
                self.composer.editor.newline();
                return true;
            }
            KeyCode::Char('a') => self.toggle_selected_archive(),
            KeyCode::Char('c') => self.toggle_selected_completion(),
            KeyCode::Char('t') => self.toggle_selected_task_status(),
            KeyCode::Char('r') => self.open_selected_thread(),
            KeyCode::Char('e') => self.edit_selected(),
            _ => return false,
        }
        true
    }

    /// Esc unwinds one layer: edit, search, thread, then selection.
    fn handle_escape(&mut self) {
        if self.composer.editing_id.is_some() {
            self.cancel_edit();
        } else if self.search.is_active {
            self.clear_search();
            self.status = None;
        } else if self.ui.active_thread_id.is_some() {
            self.close_thread();
        } else {
            self.clear_selection();
        }
    }

    /// Editing keys for the composer.
    fn handle_composer_key(&mut self, key: KeyEvent) {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let editor = &mut self.composer.editor;
        match key.code {
            KeyCode::Enter if shift => editor.newline(),
            KeyCode::Enter => editor.enter(),
            KeyCode::Char(c) => editor.insert_char(c),
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Delete => editor.delete(),
            KeyCode::Left => editor.move_left(shift),
            KeyCode::Right => editor.move_right(shift),
            KeyCode::Up => editor.move_up(shift),
            KeyCode::Down => editor.move_down(shift),
            KeyCode::Home => editor.move_home(shift),
            KeyCode::End => editor.move_end(shift),
            KeyCode::Tab => {
                editor.indent();
            }
            KeyCode::BackTab => {
                editor.outdent();
            }
            _ => return,
        }
        self.update_slash_command_popup();
    }
}
