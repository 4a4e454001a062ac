//! Main screen rendering.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{App, Pane, StatusKind, wrap_composer};
use crate::core::{MessageWithThreadInfo, TaskFilter};
use crate::tui::widgets::{
    CommandPopup, MessageListWidget, MessageRow, SidebarWidget, TermHighlight,
};

impl App {
    /// Renders every pane of the main screen.
    pub(crate) fn render_main(&self, frame: &mut Frame) {
        let layout = self.layout.main;

        self.render_header(frame, layout.header);
        if let Some(area) = layout.sidebar {
            self.render_sidebar(frame, area);
        }
        self.render_list(frame, layout.list);
        if let Some(area) = layout.thread {
            self.render_thread(frame, area);
        }
        self.render_status(frame, layout.status);
        self.render_composer(frame, layout.composer);
        self.render_footer(frame, layout.footer);

        if self.command_popup_visible() {
            self.render_command_popup(frame, layout.composer);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let channel = self.store.active_channel().map_or("?", |c| c.name.as_str());
        let mut spans = vec![
            Span::styled(" io-notes ", self.theme.header_style()),
            Span::styled(format!("#{channel}"), self.theme.normal_style()),
            Span::styled("  ", self.theme.muted_style()),
            Span::styled(self.ui.archive_filter.label(), self.theme.muted_style()),
        ];
        if self.ui.task_filter != TaskFilter::All {
            spans.push(Span::styled(" · ", self.theme.muted_style()));
            spans.push(Span::styled(self.ui.task_filter.label(), self.theme.muted_style()));
        }
        if let Some(tag) = &self.ui.selected_tag {
            spans.push(Span::styled(" · ", self.theme.muted_style()));
            spans.push(Span::styled(format!("#{tag}"), self.theme.highlight_style()));
        }
        if self.search.is_active {
            spans.push(Span::styled("  search: ", self.theme.muted_style()));
            spans.push(Span::styled(self.search.term.clone(), self.theme.highlight_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let tags = self.store.all_tags();
        let sidebar = SidebarWidget {
            channels: self.store.channels(),
            active_channel_id: self.store.active_channel_id(),
            tags: &tags,
            selected_tag: self.ui.selected_tag.as_deref(),
            archive_filter: self.ui.archive_filter,
            task_filter: self.ui.task_filter,
            theme: &self.theme,
        };
        frame.render_widget(sidebar, area);
    }

    fn list_rows<'m>(&self, messages: &'m [MessageWithThreadInfo], now: Instant) -> Vec<MessageRow<'m>> {
        let new_id = self.highlighted_id(now);
        messages
            .iter()
            .map(|m| MessageRow {
                reply_count: m.reply_count,
                is_selected: self.selected_id.as_deref() == Some(m.id.as_str()),
                is_new: new_id == Some(m.id.as_str()),
                ..MessageRow::new(&m.message)
            })
            .collect()
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let messages = self.list_messages();
        let rows = self.list_rows(&messages, Instant::now());

        let (title, empty) = if self.search.is_active {
            (
                format!("Search \"{}\"", self.search.term),
                "No messages match the search",
            )
        } else {
            let channel = self.store.active_channel().map_or("Messages", |c| c.name.as_str());
            (channel.to_string(), "No messages yet, write one below")
        };
        let highlight = (self.search.is_active
            && self.search.options.in_content
            && !self.search.term.is_empty())
        .then(|| TermHighlight {
            term: &self.search.term,
            case_sensitive: self.search.options.case_sensitive,
        });

        let widget = MessageListWidget::new(&rows, &title, &self.theme)
            .highlight(highlight)
            .scroll_offset(self.list_scroll.offset)
            .empty_text(empty)
            .focused(self.focused_pane() == Pane::List);
        frame.render_widget(widget, area);
    }

    fn render_thread(&self, frame: &mut Frame, area: Rect) {
        let Some(thread) = self.thread_view() else {
            return;
        };
        let new_id = self.highlighted_id(Instant::now());
        let rows: Vec<MessageRow<'_>> = thread
            .parent
            .into_iter()
            .chain(thread.replies.iter().copied())
            .map(|m| MessageRow {
                is_selected: self.selected_id.as_deref() == Some(m.id.as_str()),
                is_new: new_id == Some(m.id.as_str()),
                ..MessageRow::new(m)
            })
            .collect();
        let title = format!("Thread ({} replies)", thread.replies.len());

        let widget = MessageListWidget::new(&rows, &title, &self.theme)
            .scroll_offset(self.thread_scroll.offset)
            .empty_text("This thread's message was removed")
            .focused(true);
        frame.render_widget(widget, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some(status) => {
                let style = match status.kind {
                    StatusKind::Info => self.theme.normal_style(),
                    StatusKind::Success => self.theme.success_style(),
                    StatusKind::Warning => self.theme.warning_style(),
                    StatusKind::Error => self.theme.error_style(),
                };
                Line::from(Span::styled(format!(" {}", status.text), style))
            }
            None => Line::from(Span::styled(
                format!(" {} messages", self.store.messages().len()),
                self.theme.muted_style(),
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_composer(&self, frame: &mut Frame, area: Rect) {
        let title = if self.composer.editing_id.is_some() {
            " Editing "
        } else if self.ui.active_thread_id.is_some() {
            " Reply "
        } else {
            " New message "
        };
        let mut block = Block::bordered()
            .title(title)
            .title_style(self.theme.header_style())
            .border_style(self.theme.border_style());
        let images = self.composer.pending_images.len();
        if images > 0 {
            block = block.title_bottom(Line::from(Span::styled(
                format!(" {images} image(s) "),
                self.theme.highlight_style(),
            )));
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let editor = &self.composer.editor;
        let text = editor.text();
        if text.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Write a note, #tag it, start with [] for a task, / for commands",
                    self.theme.placeholder_style(),
                )),
                inner,
            );
            frame.set_cursor_position((inner.x, inner.y));
            return;
        }

        let wrap = wrap_composer(text, editor.cursor(), inner.width as usize);
        let height = inner.height as usize;
        let first = (wrap.cursor_row + 1).saturating_sub(height);
        let selection = editor.selection();

        let lines: Vec<Line> = wrap
            .rows
            .iter()
            .skip(first)
            .take(height)
            .map(|row| {
                let (start, end) = (row.start, row.end);
                let sel_start = selection.start().clamp(start, end);
                let sel_end = selection.end().clamp(start, end);
                let normal = self.theme.normal_style();
                let parts: [(usize, usize, Style); 3] = [
                    (start, sel_start, normal),
                    (sel_start, sel_end, self.theme.selection_style()),
                    (sel_end, end, normal),
                ];
                Line::from(
                    parts
                        .into_iter()
                        .filter(|(a, b, _)| a < b)
                        .map(|(a, b, style)| Span::styled(&text[a..b], style))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        let row = u16::try_from(wrap.cursor_row - first).unwrap_or(0);
        let col = u16::try_from(wrap.cursor_col).unwrap_or(u16::MAX);
        frame.set_cursor_position((
            inner.x + col.min(inner.width.saturating_sub(1)),
            inner.y + row.min(inner.height.saturating_sub(1)),
        ));
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let hints: &[(&str, &str)] = if self.command_popup_visible() {
            &[("↑/↓", "Navigate"), ("Tab", "Complete"), ("Enter", "Run"), ("Esc", "Dismiss")]
        } else if self.composer.editing_id.is_some() {
            &[("Ctrl+S", "Save"), ("Esc", "Cancel"), ("Ctrl+Z/Y", "Undo/Redo")]
        } else if self.ui.active_thread_id.is_some() {
            &[("Ctrl+S", "Reply"), ("Ctrl+↑/↓", "Select"), ("Esc", "Close thread"), ("/help", "Help")]
        } else {
            &[
                ("Ctrl+S", "Send"),
                ("Ctrl+↑/↓", "Select"),
                ("Alt+R", "Thread"),
                ("Alt+E", "Edit"),
                ("/help", "Help"),
            ]
        };
        let spans: Vec<Span> = hints
            .iter()
            .flat_map(|(key, action)| {
                [
                    Span::styled(format!(" [{key}] "), self.theme.highlight_style()),
                    Span::styled(*action, self.theme.muted_style()),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Renders the command popup above the composer, left aligned.
    fn render_command_popup(&self, frame: &mut Frame, composer: Rect) {
        let popup = CommandPopup::new(&self.composer.command_popup_state, &self.theme);
        let (width, height) = popup.preferred_size();
        if height == 0 {
            return;
        }
        let area = Rect {
            x: composer.x,
            y: composer.y.saturating_sub(height),
            width: width.min(composer.width),
            height: height.min(composer.y),
        };
        frame.render_widget(popup, area);
    }
}
