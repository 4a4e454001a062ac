//! Composer operations and layout of the composer buffer.

use unicode_width::UnicodeWidthChar;

use crate::app::{App, Highlight, StatusLine, parse_slash_command};
use crate::editor::prepare_submission;

/// One visual row of the composer, as a byte range of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualRow {
    pub start: usize,
    pub end: usize,
    /// True for the last row of a logical line.
    pub ends_line: bool,
}

/// Composer buffer wrapped to a width, plus the cursor's cell position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerWrap {
    pub rows: Vec<VisualRow>,
    pub cursor_row: usize,
    pub cursor_col: usize,
}

/// Wraps `text` at `width` display columns and locates byte offset `cursor`.
///
/// A cursor sitting exactly on a soft wrap point belongs to the following
/// row. A width of zero disables wrapping.
#[must_use]
pub fn wrap_composer(text: &str, cursor: usize, width: usize) -> ComposerWrap {
    let width = if width == 0 { usize::MAX } else { width };
    let mut rows = Vec::new();

    let mut line_start = 0;
    for line in text.split('\n') {
        let mut row_start = line_start;
        let mut used = 0;
        for (offset, ch) in line.char_indices() {
            let w = ch.width().unwrap_or(1);
            let at = line_start + offset;
            if used + w > width && at > row_start {
                rows.push(VisualRow {
                    start: row_start,
                    end: at,
                    ends_line: false,
                });
                row_start = at;
                used = 0;
            }
            used += w;
        }
        let line_end = line_start + line.len();
        rows.push(VisualRow {
            start: row_start,
            end: line_end,
            ends_line: true,
        });
        line_start = line_end + 1;
    }

    let cursor_row = rows
        .iter()
        .position(|r| cursor >= r.start && (cursor < r.end || (cursor == r.end && r.ends_line)))
        .unwrap_or(rows.len() - 1);
    let row = rows[cursor_row];
    let cursor_col = text
        .get(row.start..cursor.clamp(row.start, row.end))
        .map_or(0, |s| s.chars().map(|c| c.width().unwrap_or(1)).sum());

    ComposerWrap {
        rows,
        cursor_row,
        cursor_col,
    }
}

impl App {
    // ===== Composer Operations =====

    /// Submits the composer.
    ///
    /// A lone `/command` line naming a registered command runs it. Otherwise
    /// the text becomes a new message (a reply while a thread is open) or
    /// replaces the message being edited. Empty text without images does
    /// nothing.
    pub(super) fn submit_composer(&mut self) {
        let text = self.composer.editor.text().to_string();

        if self.composer.editing_id.is_none()
            && let Some((name, args)) = parse_slash_command(&text)
            && self.command_registry.find(name).is_some()
        {
            self.composer.reset();
            self.execute_slash_command(name, args);
            return;
        }

        if text.trim().is_empty() && self.composer.pending_images.is_empty() {
            return;
        }

        if let Some(id) = self.composer.editing_id.clone() {
            let images = self
                .composer
                .images_changed
                .then(|| std::mem::take(&mut self.composer.pending_images));
            self.status = Some(if self.store.edit_message(&id, &text, images) {
                StatusLine::success("Message updated")
            } else {
                StatusLine::warning("That message no longer exists")
            });
            self.selected_id = Some(id);
        } else {
            let content = prepare_submission(&text, self.ui.task_filter);
            let images = std::mem::take(&mut self.composer.pending_images);
            let parent = self.ui.active_thread_id.clone();
            let message = self.store.create_message(&content, images, parent.as_deref());

            self.highlight = Some(Highlight::new(message.id.clone()));
            match parent {
                Some(_) => self.thread_scroll.auto_scroll = true,
                None => self.list_scroll.auto_scroll = true,
            }
            self.status = None;
        }

        self.composer.reset();
        self.refresh_after_submit();
    }

    fn refresh_after_submit(&mut self) {
        if self.search.is_active {
            self.perform_search();
        }
    }

    /// Inserts pasted text, normalising line endings.
    pub(super) fn paste_into_composer(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        self.composer.editor.insert_str(&text);
        self.update_slash_command_popup();
    }
}
