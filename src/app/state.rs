//! Application state structures.
//!
//! - **`UiState`**: list selectors, open thread and sidebar visibility
//! - **`SearchState`**: the search session (term, options, results)
//! - **`ComposerState`**: the editor plus pending images and edit target
//! - **`LayoutState`** / **`ScrollState`**: per-frame layout and list scrolling

use std::time::{Duration, Instant};

use crate::core::{ArchiveFilter, MessageWithThreadInfo, SearchOptions, TaskFilter};
use crate::editor::Editor;
use crate::media::BatchOutcome;
use crate::tui::widgets::CommandPopupState;

/// How long a freshly created message stays emphasised.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(3);

/// Events delivered to the UI thread by background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// An image batch finished decoding.
    ImagesLoaded(BatchOutcome),
}

/// List selectors and pane visibility, persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub archive_filter: ArchiveFilter,
    pub task_filter: TaskFilter,
    pub selected_tag: Option<String>,
    /// Root message whose thread is open in the side pane.
    pub active_thread_id: Option<String>,
    pub is_sidebar_visible: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            archive_filter: ArchiveFilter::default(),
            task_filter: TaskFilter::default(),
            selected_tag: None,
            active_thread_id: None,
            is_sidebar_visible: true,
        }
    }
}

/// The search session. Results are recomputed, never persisted.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub term: String,
    pub options: SearchOptions,
    pub results: Vec<MessageWithThreadInfo>,
    /// True while results replace the filtered list.
    pub is_active: bool,
}

/// Composer state: the text editor plus what the next submission carries.
#[derive(Debug, Default)]
pub struct ComposerState {
    pub editor: Editor,
    /// Data URLs attached to the next submission.
    pub pending_images: Vec<String>,
    /// Set once the user attaches or clears images, so an edit only
    /// replaces the stored images when asked to.
    pub images_changed: bool,
    /// Message being edited, if any.
    pub editing_id: Option<String>,
    pub command_popup_state: CommandPopupState,
}

impl ComposerState {
    /// Clears the buffer, attachments and edit target.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Severity of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

/// One line of feedback shown above the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusLine {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Warning,
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }
}

/// Emphasis on the most recently created message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub message_id: String,
    pub since: Instant,
}

impl Highlight {
    #[must_use]
    pub fn new(message_id: String) -> Self {
        Self {
            message_id,
            since: Instant::now(),
        }
    }

    /// True until [`HIGHLIGHT_DURATION`] has passed since `since`.
    #[must_use]
    pub fn is_live_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.since) < HIGHLIGHT_DURATION
    }
}

/// Dynamic layout tracking state.
///
/// Stores the full [`MainLayout`] calculated once per frame so scroll
/// calculations and rendering agree on dimensions.
///
/// [`MainLayout`]: crate::app::MainLayout
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutState {
    pub main: crate::app::MainLayout,
}

impl LayoutState {
    /// Visible rows of the message list (excluding borders).
    #[must_use]
    pub const fn list_visible_height(&self) -> usize {
        self.main.list_visible_height
    }

    /// Content width of the message list (excluding borders and scrollbar).
    #[must_use]
    pub const fn list_content_width(&self) -> usize {
        self.main.list_content_width
    }
}

/// Scroll state for a panel, combining position and auto-scroll behavior.
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    /// Current scroll offset in visual lines from the top.
    pub offset: usize,
    /// Whether to stick to the bottom when content is added.
    /// Cleared when the user scrolls up, set again at the bottom.
    pub auto_scroll: bool,
}

impl ScrollState {
    /// Creates a new scroll state with auto-scroll enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            offset: 0,
            auto_scroll: true,
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0;
        self.auto_scroll = true;
    }

    /// Scrolls up by a page, disabling auto-scroll.
    pub fn page_up(&mut self, page_size: usize) {
        self.offset = self.offset.saturating_sub(page_size);
        self.auto_scroll = false;
    }

    /// Scrolls down by a page, enabling auto-scroll if at the bottom.
    pub fn page_down(&mut self, content_len: usize, visible_height: usize, page_size: usize) {
        let max_scroll = content_len.saturating_sub(visible_height);
        self.offset = (self.offset + page_size).min(max_scroll);
        self.auto_scroll = self.offset >= max_scroll;
    }

    /// Scrolls the minimum amount that brings `start..end` into view.
    pub fn ensure_visible(&mut self, start: usize, end: usize, visible_height: usize) {
        if start < self.offset {
            self.offset = start;
        } else if end > self.offset + visible_height {
            self.offset = end.saturating_sub(visible_height).min(start);
        }
    }

    /// Sticks to the bottom when enabled, and clamps the offset otherwise.
    pub fn settle(&mut self, content_len: usize, visible_height: usize) {
        let max_scroll = content_len.saturating_sub(visible_height);
        if self.auto_scroll {
            self.offset = max_scroll;
        } else {
            self.offset = self.offset.min(max_scroll);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_state_defaults_match_persisted_defaults() {
        let state = UiState::default();
        assert_eq!(state.archive_filter, ArchiveFilter::Unarchived);
        assert_eq!(state.task_filter, TaskFilter::All);
        assert!(state.selected_tag.is_none());
        assert!(state.is_sidebar_visible);
    }

    #[test]
    fn highlight_expires_after_three_seconds() {
        let highlight = Highlight::new("m-1".to_string());
        assert!(highlight.is_live_at(highlight.since + Duration::from_millis(2_999)));
        assert!(!highlight.is_live_at(highlight.since + HIGHLIGHT_DURATION));
    }

    #[test]
    fn composer_reset_drops_edit_target_and_images() {
        let mut composer = ComposerState {
            editor: Editor::with_text("draft"),
            pending_images: vec!["data:image/png;base64,AA==".to_string()],
            images_changed: true,
            editing_id: Some("m-1".to_string()),
            command_popup_state: CommandPopupState::Hidden,
        };
        composer.reset();
        assert!(composer.editor.is_blank());
        assert!(composer.pending_images.is_empty());
        assert!(!composer.images_changed);
        assert!(composer.editing_id.is_none());
    }

    mod scroll {
        use super::*;

        #[test]
        fn new_has_auto_scroll() {
            let state = ScrollState::new();
            assert_eq!(state.offset, 0);
            assert!(state.auto_scroll);
        }

        #[test]
        fn page_up_saturates_and_disables_auto_scroll() {
            let mut state = ScrollState::new();
            state.offset = 5;
            state.page_up(10);
            assert_eq!(state.offset, 0);
            assert!(!state.auto_scroll);
        }

        #[test]
        fn page_down_caps_at_bottom_and_re_enables_auto_scroll() {
            let mut state = ScrollState::new();
            state.auto_scroll = false;
            state.offset = 75;
            state.page_down(100, 20, 10);
            assert_eq!(state.offset, 80);
            assert!(state.auto_scroll);
        }

        #[test]
        fn ensure_visible_scrolls_up_to_start() {
            let mut state = ScrollState::new();
            state.offset = 30;
            state.ensure_visible(10, 14, 20);
            assert_eq!(state.offset, 10);
        }

        #[test]
        fn ensure_visible_scrolls_down_to_end() {
            let mut state = ScrollState::new();
            state.ensure_visible(40, 45, 20);
            assert_eq!(state.offset, 25);
        }

        #[test]
        fn ensure_visible_prefers_start_for_tall_items() {
            let mut state = ScrollState::new();
            state.ensure_visible(10, 50, 20);
            assert_eq!(state.offset, 10);
        }

        #[test]
        fn settle_clamps_when_not_following() {
            let mut state = ScrollState::new();
            state.auto_scroll = false;
            state.offset = 90;
            state.settle(50, 20);
            assert_eq!(state.offset, 30);

            state.auto_scroll = true;
            state.offset = 0;
            state.settle(50, 20);
            assert_eq!(state.offset, 30);
        }

        #[test]
        fn settle_with_short_content_stays_at_top() {
            let mut state = ScrollState::new();
            state.settle(5, 20);
            assert_eq!(state.offset, 0);
        }
    }
}
