//! Slash command parsing, completion and dispatch.
//!
//! - Completion ([`command_prefix`]): the popup is shown while the whole
//!   composer is a single `/name` token
//! - Parsing ([`parse_slash_command`]): splits a submitted line into name
//!   and arguments

use crate::app::App;
use crate::core::CommandContext;
use crate::tui::widgets::CommandMatch;

/// Splits a submitted single-line `/command args` into name and arguments.
///
/// ```
/// use io_notes::app::slash_commands::parse_slash_command;
///
/// assert_eq!(parse_slash_command("/exit"), Some(("exit", None)));
/// assert_eq!(parse_slash_command("/search  milk "), Some(("search", Some("milk"))));
/// assert_eq!(parse_slash_command("a note"), None);
/// assert_eq!(parse_slash_command("/"), None);
/// assert_eq!(parse_slash_command("/tag\nsecond line"), None);
/// ```
#[must_use]
pub fn parse_slash_command(input: &str) -> Option<(&str, Option<&str>)> {
    let line = input.trim();
    if line.contains('\n') {
        return None;
    }
    let rest = line.strip_prefix('/')?;
    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, Some(args.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };
    (!name.is_empty()).then_some((name, args))
}

/// Name typed so far while the buffer is exactly `/` plus a partial name.
///
/// ```
/// use io_notes::app::slash_commands::command_prefix;
///
/// assert_eq!(command_prefix("/sea"), Some("sea"));
/// assert_eq!(command_prefix("/"), Some(""));
/// assert_eq!(command_prefix("/search milk"), None);
/// assert_eq!(command_prefix("note /sea"), None);
/// ```
#[must_use]
pub fn command_prefix(buffer: &str) -> Option<&str> {
    let name = buffer.strip_prefix('/')?;
    (!name.contains(char::is_whitespace)).then_some(name)
}

impl App {
    pub(crate) fn command_context(&self) -> CommandContext<'_> {
        CommandContext {
            archive_filter: self.ui.archive_filter,
            task_filter: self.ui.task_filter,
            search_options: &self.search.options,
            has_selection: self.selected_id.is_some(),
        }
    }

    /// Runs a parsed command and applies its result.
    pub(crate) fn execute_slash_command(&mut self, name: &str, args: Option<&str>) {
        let result = self
            .command_registry
            .dispatch(name, args, &self.command_context());
        tracing::debug!(command = name, ?result, "slash command");
        self.handle_command_result(result);
    }

    /// Shows matching commands while the composer holds a `/name` token.
    pub(crate) fn update_slash_command_popup(&mut self) {
        let state = &self.composer.command_popup_state;
        let next = match command_prefix(self.composer.editor.text()) {
            Some(prefix) if self.composer.editing_id.is_none() => {
                let matches = self
                    .command_registry
                    .matching(prefix)
                    .into_iter()
                    .map(CommandMatch::from)
                    .collect();
                state.refreshed(matches)
            }
            _ => state.refreshed(Vec::new()),
        };
        self.composer.command_popup_state = next;
    }

    /// Replaces the buffer with the highlighted command, ready for arguments.
    pub(crate) fn complete_command_from_popup(&mut self) {
        let Some(name) = self.composer.command_popup_state.selected_command() else {
            return;
        };
        self.composer.editor = crate::editor::Editor::with_text(&format!("/{name} "));
        self.dismiss_command_popup();
    }

    pub(crate) fn dismiss_command_popup(&mut self) {
        self.composer.command_popup_state = crate::tui::widgets::CommandPopupState::Hidden;
    }

    #[must_use]
    pub fn command_popup_visible(&self) -> bool {
        self.composer.command_popup_state.is_visible()
    }
}
