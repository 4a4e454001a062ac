//! Layout calculation helpers for the TUI.
//!
//! Single source of truth for pane geometry, shared by
//! `App::update_layout` and `App::render` so scroll math and drawing agree.

use ratatui::layout::{Constraint, Layout, Rect};

/// Sidebar width in columns.
pub const SIDEBAR_WIDTH: u16 = 26;

/// Composer height in rows, borders included.
pub const COMPOSER_HEIGHT: u16 = 7;

/// Layout of the main screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainLayout {
    /// Header (1 line): channel, selectors, search.
    pub header: Rect,
    /// Channel/tag/filter sidebar, when visible.
    pub sidebar: Option<Rect>,
    /// Message list or search results.
    pub list: Rect,
    /// Thread pane, when a thread is open.
    pub thread: Option<Rect>,
    /// Status line (1 line).
    pub status: Rect,
    /// Composer.
    pub composer: Rect,
    /// Key hints (1 line).
    pub footer: Rect,
    /// Visible rows of the list (excluding borders).
    pub list_visible_height: usize,
    /// Content width of the list (excluding borders and scrollbar).
    pub list_content_width: usize,
    /// Inner width of the composer (excluding borders).
    pub composer_inner_width: usize,
    /// Inner height of the composer (excluding borders).
    pub composer_inner_height: usize,
}

const VERTICAL_CONSTRAINTS: [Constraint; 5] = [
    Constraint::Length(1),               // Header
    Constraint::Min(4),                  // Body (sidebar, list, thread)
    Constraint::Length(1),               // Status
    Constraint::Length(COMPOSER_HEIGHT), // Composer
    Constraint::Length(1),               // Footer
];

/// Calculates the main layout.
#[must_use]
pub fn calculate_main_layout(area: Rect, sidebar_visible: bool, thread_open: bool) -> MainLayout {
    let rows = Layout::vertical(VERTICAL_CONSTRAINTS).split(area);
    let body = rows[1];

    let (sidebar, rest) = if sidebar_visible {
        let cols = Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
            .split(body);
        (Some(cols[0]), cols[1])
    } else {
        (None, body)
    };

    let (list, thread) = if thread_open {
        let cols = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rest);
        (cols[0], Some(cols[1]))
    } else {
        (rest, None)
    };

    let composer = rows[3];

    MainLayout {
        header: rows[0],
        sidebar,
        list,
        thread,
        status: rows[2],
        composer,
        footer: rows[4],
        list_visible_height: list.height.saturating_sub(2) as usize,
        list_content_width: list.width.saturating_sub(3) as usize,
        composer_inner_width: composer.width.saturating_sub(2) as usize,
        composer_inner_height: composer.height.saturating_sub(2) as usize,
    }
}
