//! The composer's text buffer and its markdown-aware editing transforms.
//!
//! Offsets are byte offsets into the buffer and always sit on character
//! boundaries. Every mutation that is not itself an undo or redo records a
//! whole-buffer snapshot in [`History`].
//!
//! ## Structure
//!
//! - [`list`]: list continuation, bullet/number toggles, indent and outdent
//! - [`format`]: inline marker pairs (`**`, `*`, `~~`, `<u>`)
//! - [`history`]: linear undo/redo

pub mod format;
pub mod history;
pub mod list;

pub use format::InlineFormat;
pub use history::History;
pub use list::ListKind;

use crate::core::filter::TaskFilter;
use crate::core::parse::{DONE_TASK_MARKER, OPEN_TASK_MARKER, detect_task_marker};

/// Selection as an anchor and a moving head. Equal ends mean a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    #[must_use]
    pub const fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    #[must_use]
    pub const fn caret(at: usize) -> Self {
        Self {
            anchor: at,
            head: at,
        }
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

/// A new buffer value and where the selection ends up in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    pub text: String,
    pub selection: Selection,
}

/// Editable buffer with selection and undo history.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    text: String,
    selection: Selection,
    history: History,
}

impl Editor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh buffer holding `text` with the caret at the end.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            selection: Selection::caret(text.len()),
            history: History::new(text.to_string()),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Caret position (the selection head).
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.selection.head
    }

    /// True when the buffer holds only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Logical lines of the buffer.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    /// Row and byte column of the caret within its line.
    #[must_use]
    pub fn cursor_row_col(&self) -> (usize, usize) {
        let cursor = self.cursor();
        let row = self.text[..cursor].matches('\n').count();
        (row, cursor - list::line_start(&self.text, cursor))
    }

    /// Moves the selection, snapping both ends to character boundaries.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Selection::new(
            self.clamp(selection.anchor),
            self.clamp(selection.head),
        );
    }

    /// Drops the buffer and its history.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Installs a transform result and records it.
    fn apply(&mut self, transform: Transform) {
        if transform.text == self.text {
            self.set_selection(transform.selection);
            return;
        }
        self.text = transform.text;
        self.set_selection(transform.selection);
        self.history.record(&self.text);
    }

    fn clamp(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    // ===== Typing =====

    /// Replaces the selection with `s` and puts the caret after it.
    pub fn insert_str(&mut self, s: &str) {
        let (start, end) = (self.selection.start(), self.selection.end());
        let mut text = String::with_capacity(self.text.len() + s.len());
        text.push_str(&self.text[..start]);
        text.push_str(s);
        text.push_str(&self.text[end..]);
        self.apply(Transform {
            text,
            selection: Selection::caret(start + s.len()),
        });
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    /// Inserts a plain line break.
    pub fn newline(&mut self) {
        self.insert_str("\n");
    }

    /// Line break with list continuation.
    pub fn enter(&mut self) {
        match list::continue_list(&self.text, self.selection) {
            Some(transform) => self.apply(transform),
            None => self.newline(),
        }
    }

    /// Deletes the selection, or the character before the caret.
    pub fn backspace(&mut self) {
        if self.selection.is_empty() {
            let at = self.cursor();
            if at == 0 {
                return;
            }
            self.selection = Selection::new(at, prev_boundary(&self.text, at));
        }
        self.insert_str("");
    }

    /// Deletes the selection, or the character after the caret.
    pub fn delete(&mut self) {
        if self.selection.is_empty() {
            let at = self.cursor();
            if at == self.text.len() {
                return;
            }
            self.selection = Selection::new(at, next_boundary(&self.text, at));
        }
        self.insert_str("");
    }

    // ===== Movement =====

    fn move_to(&mut self, head: usize, extend: bool) {
        let anchor = if extend { self.selection.anchor } else { head };
        self.set_selection(Selection::new(anchor, head));
    }

    pub fn move_left(&mut self, extend: bool) {
        let head = if !extend && !self.selection.is_empty() {
            self.selection.start()
        } else {
            prev_boundary(&self.text, self.cursor())
        };
        self.move_to(head, extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        let head = if !extend && !self.selection.is_empty() {
            self.selection.end()
        } else {
            next_boundary(&self.text, self.cursor())
        };
        self.move_to(head, extend);
    }

    pub fn move_home(&mut self, extend: bool) {
        self.move_to(list::line_start(&self.text, self.cursor()), extend);
    }

    pub fn move_end(&mut self, extend: bool) {
        self.move_to(list::line_end(&self.text, self.cursor()), extend);
    }

    pub fn move_up(&mut self, extend: bool) {
        let cursor = self.cursor();
        let start = list::line_start(&self.text, cursor);
        if start == 0 {
            self.move_to(0, extend);
            return;
        }
        let column = self.text[start..cursor].chars().count();
        let target = list::line_start(&self.text, start - 1);
        self.move_to(offset_at_column(&self.text, target, column), extend);
    }

    pub fn move_down(&mut self, extend: bool) {
        let cursor = self.cursor();
        let end = list::line_end(&self.text, cursor);
        if end == self.text.len() {
            self.move_to(end, extend);
            return;
        }
        let start = list::line_start(&self.text, cursor);
        let column = self.text[start..cursor].chars().count();
        self.move_to(offset_at_column(&self.text, end + 1, column), extend);
    }

    pub fn select_all(&mut self) {
        self.selection = Selection::new(0, self.text.len());
    }

    // ===== Structure =====

    pub fn toggle_format(&mut self, format: InlineFormat) {
        let transform = format::apply_inline_format(&self.text, self.selection, format);
        self.apply(transform);
    }

    pub fn toggle_list(&mut self, kind: ListKind) {
        let transform = list::toggle_list(&self.text, self.selection, kind);
        self.apply(transform);
    }

    /// Indents the touched list lines. Returns false when nothing changed.
    pub fn indent(&mut self) -> bool {
        list::indent(&self.text, self.selection).is_some_and(|t| {
            self.apply(t);
            true
        })
    }

    /// Outdents the touched list lines. Returns false when nothing changed.
    pub fn outdent(&mut self) -> bool {
        list::outdent(&self.text, self.selection).is_some_and(|t| {
            self.apply(t);
            true
        })
    }

    // ===== History =====

    /// Restores the previous snapshot with the caret at its end.
    pub fn undo(&mut self) -> bool {
        let Some(text) = self.history.undo().map(ToString::to_string) else {
            return false;
        };
        self.selection = Selection::caret(text.len());
        self.text = text;
        true
    }

    /// Restores the next snapshot with the caret at its end.
    pub fn redo(&mut self) -> bool {
        let Some(text) = self.history.redo().map(ToString::to_string) else {
            return false;
        };
        self.selection = Selection::caret(text.len());
        self.text = text;
        true
    }
}

fn prev_boundary(text: &str, at: usize) -> usize {
    text[..at].chars().next_back().map_or(0, |c| at - c.len_utf8())
}

fn next_boundary(text: &str, at: usize) -> usize {
    text[at..].chars().next().map_or(at, |c| at + c.len_utf8())
}

/// Offset of the `column`-th character of the line starting at `line_start`,
/// clamped to the line's end.
fn offset_at_column(text: &str, line_start: usize, column: usize) -> usize {
    let line_end = list::line_end(text, line_start);
    text[line_start..line_end]
        .char_indices()
        .nth(column)
        .map_or(line_end, |(i, _)| line_start + i)
}

/// Prefixes a task marker when a task view is active.
///
/// The completed-tasks view produces completed tasks; the other task views
/// produce open ones. Text that already carries a marker is left alone.
///
/// ```
/// use io_notes::core::filter::TaskFilter;
/// use io_notes::editor::prepare_submission;
///
/// assert_eq!(prepare_submission("buy milk", TaskFilter::Tasks), "[] buy milk");
/// assert_eq!(prepare_submission("done", TaskFilter::CompletedTasks), "[x] done");
/// assert_eq!(prepare_submission("[x] done", TaskFilter::Tasks), "[x] done");
/// assert_eq!(prepare_submission("note", TaskFilter::All), "note");
/// ```
#[must_use]
pub fn prepare_submission(text: &str, task_filter: TaskFilter) -> String {
    if !task_filter.is_task_context() || detect_task_marker(text).is_some() {
        return text.to_string();
    }
    let marker = if task_filter == TaskFilter::CompletedTasks {
        DONE_TASK_MARKER
    } else {
        OPEN_TASK_MARKER
    };
    format!("{marker} {text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> Editor {
        let mut editor = Editor::new();
        editor.insert_str(text);
        editor
    }

    #[test]
    fn typing_records_history() {
        let mut editor = Editor::new();
        editor.insert_char('a');
        editor.insert_char('é');
        assert_eq!(editor.text(), "aé");
        assert_eq!(editor.cursor(), 3);
        assert_eq!(editor.history().len(), 3);
    }

    #[test]
    fn undo_twice_then_redo_twice() {
        let mut editor = Editor::new();
        editor.insert_str("A");
        editor.insert_str("B");
        editor.insert_str("C");

        assert!(editor.undo());
        assert!(editor.undo());
        assert_eq!(editor.text(), "A");
        assert_eq!(editor.cursor(), 1);

        assert!(editor.redo());
        assert!(editor.redo());
        assert_eq!(editor.text(), "ABC");
        assert!(!editor.redo());
    }

    #[test]
    fn edit_after_undo_truncates_redo() {
        let mut editor = typed("A");
        editor.insert_str("B");
        editor.undo();
        editor.insert_str("X");
        assert_eq!(editor.text(), "AX");
        assert!(!editor.redo());
        editor.undo();
        assert_eq!(editor.text(), "A");
    }

    #[test]
    fn backspace_and_delete_respect_char_boundaries() {
        let mut editor = typed("añb");
        editor.move_left(false);
        editor.backspace();
        assert_eq!(editor.text(), "ab");
        assert_eq!(editor.cursor(), 1);
        editor.delete();
        assert_eq!(editor.text(), "a");
        editor.delete();
        assert_eq!(editor.text(), "a");
    }

    #[test]
    fn backspace_at_start_records_nothing() {
        let mut editor = Editor::new();
        editor.backspace();
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn selection_is_replaced_by_typing() {
        let mut editor = typed("hello world");
        editor.set_selection(Selection::new(6, 11));
        editor.insert_str("there");
        assert_eq!(editor.text(), "hello there");
    }

    #[test]
    fn set_selection_snaps_to_boundaries() {
        let mut editor = typed("日本");
        editor.set_selection(Selection::new(1, 100));
        assert_eq!(editor.selection(), Selection::new(0, 6));
    }

    #[test]
    fn enter_continues_lists() {
        let mut editor = typed("- item1");
        editor.enter();
        assert_eq!(editor.text(), "- item1\n- ");
        assert_eq!(editor.cursor(), editor.text().len());

        editor.enter();
        assert_eq!(editor.text(), "- item1\n");
        assert_eq!(editor.cursor(), 8);
    }

    #[test]
    fn enter_on_plain_text_breaks_line() {
        let mut editor = typed("plain");
        editor.enter();
        assert_eq!(editor.text(), "plain\n");
    }

    #[test]
    fn vertical_movement_keeps_column() {
        let mut editor = typed("abcd\nx\nlonger");
        editor.set_selection(Selection::caret(3));
        editor.move_down(false);
        assert_eq!(editor.cursor(), 6);
        editor.move_down(false);
        assert_eq!(editor.cursor(), 8);
        editor.move_up(false);
        editor.move_up(false);
        assert_eq!(editor.cursor(), 1);
        editor.move_up(false);
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn shift_movement_extends_selection() {
        let mut editor = typed("abc");
        editor.move_left(true);
        editor.move_left(true);
        assert_eq!(editor.selection(), Selection::new(3, 1));
        editor.move_right(false);
        assert_eq!(editor.selection(), Selection::caret(3));
    }

    #[test]
    fn format_and_list_go_through_history() {
        let mut editor = typed("x");
        editor.select_all();
        editor.toggle_format(InlineFormat::Bold);
        assert_eq!(editor.text(), "**x**");
        editor.toggle_list(ListKind::Bullet);
        assert_eq!(editor.text(), "- **x**");
        editor.undo();
        assert_eq!(editor.text(), "**x**");
    }

    #[test]
    fn indent_is_a_no_op_off_lists() {
        let mut editor = typed("plain");
        assert!(!editor.indent());
        assert_eq!(editor.history().len(), 2);

        let mut editor = typed("- a");
        assert!(editor.indent());
        assert_eq!(editor.text(), "  - a");
        assert!(editor.outdent());
        assert_eq!(editor.text(), "- a");
    }

    #[test]
    fn cursor_row_col_reports_line_position() {
        let editor = typed("one\ntwo");
        assert_eq!(editor.cursor_row_col(), (1, 3));
    }

    #[test]
    fn with_text_starts_fresh_history() {
        let mut editor = Editor::with_text("[] loaded");
        assert_eq!(editor.cursor(), 9);
        assert!(!editor.undo());
    }

    #[test]
    fn submission_prefix_follows_task_view() {
        assert_eq!(prepare_submission("a", TaskFilter::UncompletedTasks), "[] a");
        assert_eq!(prepare_submission("  [] a", TaskFilter::CompletedTasks), "  [] a");
    }
}
