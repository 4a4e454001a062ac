//! Help overlay rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::app::App;

/// Key bindings listed in the overlay.
const KEY_BINDINGS: &[(&str, &str)] = &[
    ("Ctrl+S / Ctrl+Enter", "Send, or save the message being edited"),
    ("Enter", "New line, continuing lists"),
    ("Shift+Enter / Alt+Enter", "Plain new line"),
    ("Ctrl+B / Ctrl+E", "Bold / italic"),
    ("Ctrl+U / Ctrl+X", "Underline / strikethrough"),
    ("Ctrl+L / Ctrl+N", "Bullet / numbered list"),
    ("Tab / Shift+Tab", "Indent / outdent list item"),
    ("Ctrl+Z / Ctrl+Y", "Undo / redo"),
    ("Ctrl+Up / Ctrl+Down", "Select message"),
    ("Alt+A", "Archive or restore selected"),
    ("Alt+C / Alt+T", "Complete task / toggle task"),
    ("Alt+R / Alt+E", "Open thread / edit selected"),
    ("PageUp / PageDown", "Scroll"),
    ("Esc", "Cancel edit, clear search, close thread"),
    ("Ctrl+C", "Quit"),
];

impl App {
    pub(crate) fn render_help(&self, frame: &mut Frame) {
        let area = centered(frame.area(), 76, 36);
        let key_width = KEY_BINDINGS.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

        let mut lines = vec![Line::from(Span::styled("Keys", self.theme.header_style()))];
        lines.extend(KEY_BINDINGS.iter().map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("  {key:key_width$}  "), self.theme.highlight_style()),
                Span::styled(*action, self.theme.normal_style()),
            ])
        }));

        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Commands", self.theme.header_style())));
        let usage_width = self
            .command_registry
            .all()
            .iter()
            .map(|cmd| cmd.usage().len())
            .max()
            .unwrap_or(0);
        lines.extend(self.command_registry.all().iter().map(|cmd| {
            Line::from(vec![
                Span::styled(
                    format!("  {:usage_width$}  ", cmd.usage()),
                    self.theme.highlight_style(),
                ),
                Span::styled(cmd.description(), self.theme.muted_style()),
            ])
        }));

        let block = Block::bordered()
            .title(" Help ")
            .title_style(self.theme.header_style())
            .title_bottom(Line::from(Span::styled(" Esc to close ", self.theme.muted_style())))
            .border_style(self.theme.border_style());

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
