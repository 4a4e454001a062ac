//! Scrollable message list.
//!
//! Each message renders as a header line (selection mark, task box,
//! timestamp, tags, reply count, flags) followed by its wrapped content and
//! a blank separator. Search matches inside the content are highlighted.

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
        Widget,
    },
};
use unicode_width::UnicodeWidthChar;

use crate::core::{Message, Segment, highlight_segments};
use crate::tui::Theme;

/// Columns content is indented under its header.
const CONTENT_INDENT: &str = "  ";

/// One message as the list shows it.
#[derive(Debug, Clone, Copy)]
pub struct MessageRow<'a> {
    pub message: &'a Message,
    pub reply_count: Option<usize>,
    pub is_selected: bool,
    /// Emphasised as the message just added.
    pub is_new: bool,
}

impl<'a> MessageRow<'a> {
    #[must_use]
    pub const fn new(message: &'a Message) -> Self {
        Self {
            message,
            reply_count: None,
            is_selected: false,
            is_new: false,
        }
    }
}

/// Search term to highlight in content.
#[derive(Debug, Clone, Copy)]
pub struct TermHighlight<'a> {
    pub term: &'a str,
    pub case_sensitive: bool,
}

/// Wraps `text` into lines of at most `width` columns.
///
/// Matches of `highlight` keep `matched` style across wrap points. A width
/// of zero disables wrapping.
fn wrap_content(
    text: &str,
    highlight: Option<TermHighlight<'_>>,
    width: usize,
    normal: Style,
    matched: Style,
) -> Vec<Line<'static>> {
    let width = if width == 0 { usize::MAX } else { width };
    let mut lines = Vec::new();

    for logical in text.split('\n') {
        let segments = match highlight {
            Some(h) if !h.term.is_empty() => highlight_segments(logical, h.term, h.case_sensitive),
            _ => vec![Segment {
                text: logical,
                highlighted: false,
            }],
        };

        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut current = String::new();
        let mut used = 0;
        for segment in segments {
            let style = if segment.highlighted { matched } else { normal };
            for ch in segment.text.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if used + ch_width > width && used > 0 {
                    if !current.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut current), style));
                    }
                    lines.push(Line::from(std::mem::take(&mut spans)));
                    used = 0;
                }
                current.push(ch);
                used += ch_width;
            }
            if !current.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut current), style));
            }
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn content_width(list_width: usize) -> usize {
    list_width.saturating_sub(CONTENT_INDENT.len()).max(1)
}

/// Visual lines taken by one row: header, content, separator.
#[must_use]
pub fn row_height(row: &MessageRow<'_>, list_width: usize) -> usize {
    let content = wrap_content(
        &row.message.content,
        None,
        content_width(list_width),
        Style::default(),
        Style::default(),
    );
    content.len() + 2
}

/// `(start, end)` visual line range of every row.
#[must_use]
pub fn row_extents(rows: &[MessageRow<'_>], list_width: usize) -> Vec<(usize, usize)> {
    let mut start = 0;
    rows.iter()
        .map(|row| {
            let end = start + row_height(row, list_width);
            let extent = (start, end);
            start = end;
            extent
        })
        .collect()
}

/// Total visual lines of `rows`.
#[must_use]
pub fn total_height(rows: &[MessageRow<'_>], list_width: usize) -> usize {
    row_extents(rows, list_width).last().map_or(0, |(_, end)| *end)
}

fn header_line(row: &MessageRow<'_>, theme: &Theme) -> Line<'static> {
    let message = row.message;
    let base = if row.is_selected {
        theme.highlight_style()
    } else if row.is_new {
        theme.success_style().add_modifier(Modifier::BOLD)
    } else {
        theme.muted_style()
    };

    let mut spans = vec![Span::styled(
        if row.is_selected { "▶ " } else { "  " },
        theme.highlight_style(),
    )];
    if message.is_task {
        let (mark, style) = if message.is_completed {
            ("[x] ", theme.success_style())
        } else {
            ("[ ] ", theme.warning_style())
        };
        spans.push(Span::styled(mark, style));
    }
    spans.push(Span::styled(
        message
            .created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        base,
    ));
    for tag in &message.tags {
        spans.push(Span::styled(format!(" #{tag}"), theme.highlight_style()));
    }
    if let Some(count) = row.reply_count {
        let noun = if count == 1 { "reply" } else { "replies" };
        spans.push(Span::styled(format!("  ↳ {count} {noun}"), theme.normal_style()));
    }
    if message.image_count() > 0 {
        spans.push(Span::styled(
            format!("  [{} img]", message.image_count()),
            theme.muted_style(),
        ));
    }
    if message.is_archived {
        spans.push(Span::styled("  archived", theme.muted_style()));
    }
    if row.is_new {
        spans.push(Span::styled("  new", theme.success_style()));
    }
    Line::from(spans)
}

fn row_lines(
    row: &MessageRow<'_>,
    highlight: Option<TermHighlight<'_>>,
    list_width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut normal = theme.normal_style();
    if row.message.is_task && row.message.is_completed {
        normal = normal.add_modifier(Modifier::CROSSED_OUT);
    }
    let matched = theme.match_style();

    let mut lines = vec![header_line(row, theme)];
    for line in wrap_content(
        &row.message.content,
        highlight,
        content_width(list_width),
        normal,
        matched,
    ) {
        let mut spans = vec![Span::raw(CONTENT_INDENT)];
        spans.extend(line.spans);
        lines.push(Line::from(spans));
    }
    lines.push(Line::default());
    lines
}

/// A scrollable list of messages.
pub struct MessageListWidget<'a> {
    rows: &'a [MessageRow<'a>],
    title: &'a str,
    highlight: Option<TermHighlight<'a>>,
    scroll_offset: usize,
    empty_text: &'a str,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> MessageListWidget<'a> {
    #[must_use]
    pub const fn new(rows: &'a [MessageRow<'a>], title: &'a str, theme: &'a Theme) -> Self {
        Self {
            rows,
            title,
            highlight: None,
            scroll_offset: 0,
            empty_text: "No messages",
            theme,
            focused: false,
        }
    }

    #[must_use]
    pub const fn highlight(mut self, highlight: Option<TermHighlight<'a>>) -> Self {
        self.highlight = highlight;
        self
    }

    #[must_use]
    pub const fn scroll_offset(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }

    #[must_use]
    pub const fn empty_text(mut self, text: &'a str) -> Self {
        self.empty_text = text;
        self
    }

    #[must_use]
    pub const fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for MessageListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.highlight_style()
        } else {
            self.theme.border_style()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        let visible_height = inner.height as usize;
        let list_width = inner.width.saturating_sub(1) as usize;

        let lines: Vec<Line> = self
            .rows
            .iter()
            .flat_map(|row| row_lines(row, self.highlight, list_width, self.theme))
            .collect();
        let total = lines.len();
        let offset = self.scroll_offset.min(total.saturating_sub(visible_height));

        let scroll_info = if total > visible_height {
            format!(
                " ({}-{}/{})",
                offset + 1,
                (offset + visible_height).min(total),
                total
            )
        } else {
            String::new()
        };
        let block = block.title(Line::from(Span::styled(
            format!(" {} [{}]{scroll_info} ", self.title, self.rows.len()),
            self.theme.header_style(),
        )));
        block.render(area, buf);

        if self.rows.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                format!("  {}", self.empty_text),
                self.theme.muted_style(),
            )))
            .render(inner, buf);
            return;
        }

        let visible: Vec<Line> = lines.into_iter().skip(offset).take(visible_height).collect();
        Paragraph::new(visible).render(inner, buf);

        if total > visible_height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"))
                .track_symbol(Some("│"))
                .thumb_symbol("█")
                .track_style(self.theme.scrollbar_track_style())
                .thumb_style(self.theme.scrollbar_thumb_style());
            let mut state = ScrollbarState::new(total)
                .position(offset)
                .viewport_content_length(visible_height);
            scrollbar.render(inner, buf, &mut state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use ratatui::{Terminal, backend::TestBackend};

    fn message(content: &str, tags: &[&str]) -> Message {
        Message {
            id: "m-1".to_string(),
            content: content.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            tags: tags.iter().map(ToString::to_string).collect(),
            is_archived: false,
            parent_id: None,
            is_task: false,
            is_completed: false,
            channel_id: "all".to_string(),
            images: None,
        }
    }

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn render(rows: &[MessageRow<'_>], highlight: Option<TermHighlight<'_>>) -> Result<Terminal<TestBackend>> {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(40, 10))?;
        terminal.draw(|f| {
            let widget = MessageListWidget::new(rows, "Messages", &theme).highlight(highlight);
            f.render_widget(widget, f.area());
        })?;
        Ok(terminal)
    }

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect()
    }

    #[test]
    fn wrapping_splits_on_width() {
        let lines = wrap_content("abcdefgh\nij", None, 3, Style::default(), Style::default());
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["abc", "def", "gh", "ij"]);
    }

    #[test]
    fn highlighted_match_survives_wrap() {
        let theme = Theme::default();
        let highlight = TermHighlight {
            term: "cdef",
            case_sensitive: false,
        };
        let lines = wrap_content(
            "abcdefgh",
            Some(highlight),
            4,
            theme.normal_style(),
            theme.match_style(),
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[1].content, "cd");
        assert_eq!(lines[0].spans[1].style, theme.match_style());
        assert_eq!(lines[1].spans[0].content, "ef");
        assert_eq!(lines[1].spans[0].style, theme.match_style());
        assert_eq!(lines[1].spans[1].style, theme.normal_style());
    }

    #[test]
    fn extents_stack_rows() {
        let short = message("one", &[]);
        let long = message("a much longer line of content", &[]);
        let rows = [MessageRow::new(&short), MessageRow::new(&long)];

        // width 12 leaves 10 columns of content: 3 lines for the long one
        let extents = row_extents(&rows, 12);
        assert_eq!(extents, vec![(0, 3), (3, 8)]);
        assert_eq!(total_height(&rows, 12), 8);
    }

    #[test]
    fn renders_header_and_content() -> Result<()> {
        let msg = message("hello world", &["work"]);
        let rows = [MessageRow {
            reply_count: Some(2),
            is_selected: true,
            ..MessageRow::new(&msg)
        }];
        let terminal = render(&rows, None)?;

        assert!(row_text(&terminal, 0).contains("Messages [1]"));
        let header = row_text(&terminal, 1);
        assert!(header.contains('▶'));
        assert!(header.contains("#work"));
        assert!(header.contains("2 replies"));
        assert!(row_text(&terminal, 2).contains("hello world"));
        Ok(())
    }

    #[test]
    fn task_rows_show_their_box() -> Result<()> {
        let mut msg = message("ship it", &[]);
        msg.is_task = true;
        msg.is_completed = true;
        let rows = [MessageRow::new(&msg)];
        let terminal = render(&rows, None)?;

        assert!(row_text(&terminal, 1).contains("[x]"));
        Ok(())
    }

    #[test]
    fn search_match_is_styled_in_buffer() -> Result<()> {
        let msg = message("find the needle here", &[]);
        let rows = [MessageRow::new(&msg)];
        let highlight = TermHighlight {
            term: "NEEDLE",
            case_sensitive: false,
        };
        let terminal = render(&rows, Some(highlight))?;

        let buffer = terminal.backend().buffer();
        let symbols: Vec<&str> = (0..40).map(|x| buffer[(x, 2)].symbol()).collect();
        let col = (0..symbols.len() - 6)
            .find(|&i| symbols[i..i + 6].concat() == "needle")
            .unwrap();
        let col = u16::try_from(col)?;
        assert_eq!(buffer[(col, 2)].style().bg, Theme::default().match_style().bg);
        assert_ne!(buffer[(col - 1, 2)].style().bg, Theme::default().match_style().bg);
        Ok(())
    }

    #[test]
    fn empty_list_shows_placeholder() -> Result<()> {
        let terminal = render(&[], None)?;
        assert!(row_text(&terminal, 1).contains("No messages"));
        Ok(())
    }
}
