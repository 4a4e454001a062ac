//! Slash command completion popup.
//!
//! Shown above the composer while the buffer is a single `/name` token.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::core::SlashCommand;
use crate::tui::Theme;

/// Rows shown before the list starts scrolling.
pub const MAX_COMMAND_POPUP_ROWS: usize = 8;

/// A command offered for completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMatch {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

impl From<&dyn SlashCommand> for CommandMatch {
    fn from(cmd: &dyn SlashCommand) -> Self {
        Self {
            name: cmd.name(),
            usage: cmd.usage(),
            description: cmd.description(),
        }
    }
}

/// Visibility and selection of the popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommandPopupState {
    #[default]
    Hidden,
    Showing {
        matches: Vec<CommandMatch>,
        selected: usize,
    },
}

impl CommandPopupState {
    /// Shows `matches`, keeping the previous selection when it still fits.
    #[must_use]
    pub fn refreshed(&self, matches: Vec<CommandMatch>) -> Self {
        if matches.is_empty() {
            return Self::Hidden;
        }
        let selected = match self {
            Self::Showing { selected, .. } => (*selected).min(matches.len() - 1),
            Self::Hidden => 0,
        };
        Self::Showing { matches, selected }
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        matches!(self, Self::Showing { .. })
    }

    pub fn select_up(&mut self) {
        if let Self::Showing { selected, .. } = self {
            *selected = selected.saturating_sub(1);
        }
    }

    pub fn select_down(&mut self) {
        if let Self::Showing { matches, selected } = self {
            *selected = (*selected + 1).min(matches.len().saturating_sub(1));
        }
    }

    /// Name of the highlighted command.
    #[must_use]
    pub fn selected_command(&self) -> Option<&'static str> {
        match self {
            Self::Showing { matches, selected } => matches.get(*selected).map(|m| m.name),
            Self::Hidden => None,
        }
    }
}

/// Widget for rendering slash command suggestions.
pub struct CommandPopup<'a> {
    state: &'a CommandPopupState,
    theme: &'a Theme,
}

impl<'a> CommandPopup<'a> {
    #[must_use]
    pub const fn new(state: &'a CommandPopupState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Preferred (width, height) in cells, borders included.
    #[must_use]
    pub fn preferred_size(&self) -> (u16, u16) {
        let CommandPopupState::Showing { matches, .. } = self.state else {
            return (0, 0);
        };
        if matches.is_empty() {
            return (0, 0);
        }
        let usage_width = matches.iter().map(|m| m.usage.width()).max().unwrap_or(0);
        let desc_width = matches.iter().map(|m| m.description.width()).max().unwrap_or(0);
        let width = u16::try_from(2 + usage_width + 2 + desc_width + 2).unwrap_or(u16::MAX);
        let rows = u16::try_from(matches.len().min(MAX_COMMAND_POPUP_ROWS)).unwrap_or(0);
        (width.min(72), rows + 2)
    }
}

impl Widget for CommandPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let CommandPopupState::Showing { matches, selected } = self.state else {
            return;
        };
        if matches.is_empty() {
            return;
        }

        Clear.render(area, buf);
        let block = Block::default()
            .title(" Commands ")
            .title_style(self.theme.header_style())
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = inner.height as usize;
        let first = (selected + 1).saturating_sub(rows);
        let usage_width = matches.iter().map(|m| m.usage.width()).max().unwrap_or(0);

        let lines: Vec<Line> = matches
            .iter()
            .enumerate()
            .skip(first)
            .take(rows)
            .map(|(i, m)| {
                let is_selected = i == *selected;
                let style = if is_selected {
                    self.theme.highlight_style()
                } else {
                    self.theme.normal_style()
                };
                let pad = usage_width.saturating_sub(m.usage.width());
                Line::from(vec![
                    Span::styled(if is_selected { "> " } else { "  " }, style),
                    Span::styled(format!("{}{}  ", m.usage, " ".repeat(pad)), style),
                    Span::styled(m.description, self.theme.muted_style()),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn sample(count: usize) -> Vec<CommandMatch> {
        [
            ("search", "/search <term>", "Search content and tags"),
            ("search-tag", "/search-tag [tag ...]", "Require tags"),
            ("sidebar", "/sidebar", "Show or hide the sidebar"),
            ("switch", "/switch <channel>", "Switch channel"),
            ("tag", "/tag [tag]", "Filter by tag"),
            ("tasks", "/tasks [view]", "Task view"),
            ("help", "/help", "List commands"),
            ("exit", "/exit", "Quit"),
            ("image", "/image <path ...>", "Attach images"),
            ("archive", "/archive [view]", "Archive view"),
        ]
        .iter()
        .take(count)
        .map(|(name, usage, description)| CommandMatch {
            name,
            usage,
            description,
        })
        .collect()
    }

    fn row(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect()
    }

    #[test]
    fn refresh_keeps_selection_in_range() {
        let state = CommandPopupState::Showing {
            matches: sample(5),
            selected: 4,
        };
        let state = state.refreshed(sample(2));
        assert_eq!(state.selected_command(), Some("search-tag"));
        assert_eq!(state.refreshed(Vec::new()), CommandPopupState::Hidden);
        assert_eq!(
            CommandPopupState::Hidden.refreshed(sample(3)).selected_command(),
            Some("search")
        );
    }

    #[test]
    fn selection_saturates_at_both_ends() {
        let mut state = CommandPopupState::Hidden.refreshed(sample(3));
        state.select_up();
        assert_eq!(state.selected_command(), Some("search"));
        state.select_down();
        state.select_down();
        state.select_down();
        assert_eq!(state.selected_command(), Some("sidebar"));
    }

    #[test]
    fn preferred_size_caps_rows() {
        let theme = Theme::default();
        let hidden = CommandPopupState::Hidden;
        assert_eq!(CommandPopup::new(&hidden, &theme).preferred_size(), (0, 0));

        let many = CommandPopupState::Hidden.refreshed(sample(10));
        let (_, height) = CommandPopup::new(&many, &theme).preferred_size();
        assert_eq!(height as usize, MAX_COMMAND_POPUP_ROWS + 2);
    }

    #[test]
    fn renders_usage_and_description() -> Result<()> {
        let theme = Theme::default();
        let state = CommandPopupState::Hidden.refreshed(sample(2));
        let mut terminal = Terminal::new(TestBackend::new(70, 6))?;
        terminal.draw(|f| f.render_widget(CommandPopup::new(&state, &theme), Rect::new(0, 0, 70, 4)))?;

        assert!(row(&terminal, 0).contains("Commands"));
        assert!(row(&terminal, 1).contains("> /search <term>"));
        assert!(row(&terminal, 1).contains("Search content and tags"));
        assert!(row(&terminal, 2).contains("/search-tag"));
        Ok(())
    }

    #[test]
    fn list_scrolls_to_keep_selection_visible() -> Result<()> {
        let theme = Theme::default();
        let mut state = CommandPopupState::Hidden.refreshed(sample(10));
        for _ in 0..9 {
            state.select_down();
        }
        let mut terminal = Terminal::new(TestBackend::new(70, 6))?;
        terminal.draw(|f| f.render_widget(CommandPopup::new(&state, &theme), Rect::new(0, 0, 70, 5)))?;

        assert!(row(&terminal, 3).contains("> /archive"));
        Ok(())
    }
}
