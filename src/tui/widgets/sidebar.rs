//! Sidebar with channels, tags and the active list selectors.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::core::{ArchiveFilter, Channel, TaskFilter};
use crate::tui::Theme;

/// Snapshot of what the sidebar lists.
pub struct SidebarWidget<'a> {
    pub channels: &'a [Channel],
    pub active_channel_id: &'a str,
    pub tags: &'a [&'a str],
    pub selected_tag: Option<&'a str>,
    pub archive_filter: ArchiveFilter,
    pub task_filter: TaskFilter,
    pub theme: &'a Theme,
}

impl SidebarWidget<'_> {
    fn section(&self, title: &str) -> Line<'static> {
        Line::from(Span::styled(title.to_string(), self.theme.header_style()))
    }

    fn entry(&self, text: String, active: bool) -> Line<'static> {
        if active {
            Line::from(vec![
                Span::styled("● ", self.theme.highlight_style()),
                Span::styled(text, self.theme.highlight_style()),
            ])
        } else {
            Line::from(vec![
                Span::raw("  "),
                Span::styled(text, self.theme.normal_style()),
            ])
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![self.section("Channels")];
        for channel in self.channels {
            lines.push(self.entry(
                channel.name.clone(),
                channel.id == self.active_channel_id,
            ));
        }

        lines.push(Line::default());
        lines.push(self.section("Tags"));
        if self.tags.is_empty() {
            lines.push(Line::from(Span::styled("  none yet", self.theme.muted_style())));
        }
        for tag in self.tags {
            lines.push(self.entry(format!("#{tag}"), self.selected_tag == Some(*tag)));
        }

        lines.push(Line::default());
        lines.push(self.section("View"));
        lines.push(Line::from(vec![
            Span::styled("  Archive: ", self.theme.muted_style()),
            Span::styled(self.archive_filter.label(), self.theme.normal_style()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  Tasks:   ", self.theme.muted_style()),
            Span::styled(self.task_filter.label(), self.theme.normal_style()),
        ]));
        lines
    }
}

impl Widget for SidebarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(self.lines()).render(inner, buf);
    }
}
