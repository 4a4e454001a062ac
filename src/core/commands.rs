//! Slash commands typed into the composer.
//!
//! ## Architecture
//!
//! - [`SlashCommand`] parses its own arguments and returns a [`CommandResult`]
//! - [`CommandRegistry`] looks commands up by name or prefix
//! - the app interprets the [`CommandResult`]; commands never touch the store
//!
//! ## Example
//!
//! ```rust,ignore
//! pub struct PingCommand;
//!
//! impl SlashCommand for PingCommand {
//!     fn name(&self) -> &'static str { "ping" }
//!     fn usage(&self) -> &'static str { "/ping" }
//!     fn description(&self) -> &'static str { "Replies with pong" }
//!     fn execute(&self, _args: Option<&str>, _ctx: &CommandContext) -> CommandResult {
//!         CommandResult::Message("pong".to_string())
//!     }
//! }
//! ```

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};

use crate::core::filter::{ArchiveFilter, TaskFilter};
use crate::core::search::SearchOptions;

/// How the app should respond to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Exit,
    ShowHelp,
    CreateChannel(String),
    /// Channel id or name.
    SwitchChannel(String),
    /// Channel id or name.
    DeleteChannel(String),
    SetArchiveFilter(ArchiveFilter),
    SetTaskFilter(TaskFilter),
    /// `None` clears the tag selector.
    SelectTag(Option<String>),
    /// Adds a tag to the selected message.
    AddTag(String),
    /// Runs a search with the given term and the current options.
    Search(String),
    /// Replaces the search options wholesale and re-runs the search.
    SetSearchOptions(SearchOptions),
    ClearSearch,
    AttachImages(Vec<PathBuf>),
    ClearImages,
    ToggleSidebar,
    /// Informational text for the status line.
    Message(String),
    /// Usage error for the status line.
    Error(String),
}

/// Read-only view of the app state a command may consult.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub archive_filter: ArchiveFilter,
    pub task_filter: TaskFilter,
    pub search_options: &'a SearchOptions,
    /// True while a message is selected in the list.
    pub has_selection: bool,
}

/// A named command with its own argument parsing.
pub trait SlashCommand: Send + Sync {
    /// Name without the leading slash.
    fn name(&self) -> &'static str;

    /// Usage line shown in help.
    fn usage(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn execute(&self, args: Option<&str>, ctx: &CommandContext) -> CommandResult;

    /// Returns true if this command can execute in the current context.
    fn can_execute(&self, _ctx: &CommandContext) -> bool {
        true
    }
}

/// Registry of available slash commands.
pub struct CommandRegistry {
    commands: Vec<Box<dyn SlashCommand>>,
}

impl CommandRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn register(&mut self, cmd: Box<dyn SlashCommand>) {
        self.commands.push(cmd);
    }

    /// Finds a command by exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&dyn SlashCommand> {
        self.commands
            .iter()
            .find(|cmd| cmd.name() == name)
            .map(AsRef::as_ref)
    }

    #[must_use]
    pub fn all(&self) -> &[Box<dyn SlashCommand>] {
        &self.commands
    }

    /// Commands whose names start with `prefix`, for completion hints.
    #[must_use]
    pub fn matching(&self, prefix: &str) -> Vec<&dyn SlashCommand> {
        self.commands
            .iter()
            .filter(|cmd| cmd.name().starts_with(prefix))
            .map(AsRef::as_ref)
            .collect()
    }

    /// Looks up and runs `name`, reporting unknown or unavailable commands.
    #[must_use]
    pub fn dispatch(&self, name: &str, args: Option<&str>, ctx: &CommandContext) -> CommandResult {
        match self.find(name) {
            Some(cmd) if cmd.can_execute(ctx) => cmd.execute(args, ctx),
            Some(cmd) => CommandResult::Error(format!("/{} is not available here", cmd.name())),
            None => CommandResult::Error(format!("Unknown command: /{name}")),
        }
    }

    /// Creates a registry with every built-in command.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ChannelCommand));
        registry.register(Box::new(SwitchCommand));
        registry.register(Box::new(DeleteChannelCommand));
        registry.register(Box::new(ArchiveCommand));
        registry.register(Box::new(TasksCommand));
        registry.register(Box::new(TagCommand));
        registry.register(Box::new(AddTagCommand));
        registry.register(Box::new(SearchCommand));
        registry.register(Box::new(SearchTagCommand));
        registry.register(Box::new(SearchFromCommand));
        registry.register(Box::new(SearchToCommand));
        registry.register(Box::new(SearchCaseCommand));
        registry.register(Box::new(SearchInCommand));
        registry.register(Box::new(ClearSearchCommand));
        registry.register(Box::new(ImageCommand));
        registry.register(Box::new(SidebarCommand));
        registry.register(Box::new(HelpCommand));
        registry.register(Box::new(ExitCommand));
        registry
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn usage_error(cmd: &dyn SlashCommand) -> CommandResult {
    CommandResult::Error(format!("Usage: {}", cmd.usage()))
}

/// Parses `YYYY-MM-DD` as midnight UTC.
fn parse_day(s: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_switch(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Channels
// =============================================================================

pub struct ChannelCommand;

impl SlashCommand for ChannelCommand {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn usage(&self) -> &'static str {
        "/channel <name>"
    }

    fn description(&self) -> &'static str {
        "Create a channel"
    }

    fn execute(&self, args: Option<&str>, _ctx: &CommandContext) -> CommandResult {
        args.map_or_else(
            || usage_error(self),
            |name| CommandResult::CreateChannel(name.to_string()),
        )
    }
}

pub struct SwitchCommand;

impl SlashCommand for SwitchCommand {
    fn name(&self) -> &'static str {
        "switch"
    }

    fn usage(&self) -> &'static str {
        "/switch <channel>"
    }

    fn description(&self) -> &'static str {
        "Post into and view a channel (`all` for every channel)"
    }

    fn execute(&self, args: Option<&str>, _ctx: &CommandContext) -> CommandResult {
        args.map_or_else(
            || usage_error(self),
            |channel| CommandResult::SwitchChannel(channel.to_string()),
        )
    }
}

pub struct DeleteChannelCommand;

impl SlashCommand for DeleteChannelCommand {
    fn name(&self) -> &'static str {
        "delete-channel"
    }

    fn usage(&self) -> &'static str {
        "/delete-channel <channel>"
    }

    fn description(&self) -> &'static str {
        "Delete a channel; its messages stay under all"
    }

    fn execute(&self, args: Option<&str>, _ctx: &CommandContext) -> CommandResult {
        args.map_or_else(
            || usage_error(self),
            |channel| CommandResult::DeleteChannel(channel.to_string()),
        )
    }
}

// =============================================================================
// List selectors
// =============================================================================

pub struct ArchiveCommand;

impl SlashCommand for ArchiveCommand {
    fn name(&self) -> &'static str {
        "archive"
    }

    fn usage(&self) -> &'static str {
        "/archive [all|unarchived]"
    }

    fn description(&self) -> &'static str {
        "Show or hide archived messages"
    }

    fn execute(&self, args: Option<&str>, ctx: &CommandContext) -> CommandResult {
        match args {
            None => CommandResult::SetArchiveFilter(ctx.archive_filter.next()),
            Some("all") => CommandResult::SetArchiveFilter(ArchiveFilter::All),
            Some("unarchived") => CommandResult::SetArchiveFilter(ArchiveFilter::Unarchived),
            Some(_) => usage_error(self),
        }
    }
}

pub struct TasksCommand;

impl SlashCommand for TasksCommand {
    fn name(&self) -> &'static str {
        "tasks"
    }

    fn usage(&self) -> &'static str {
        "/tasks [all|tasks|completed-tasks|uncompleted-tasks]"
    }

    fn description(&self) -> &'static str {
        "Narrow the list to tasks"
    }

    fn execute(&self, args: Option<&str>, ctx: &CommandContext) -> CommandResult {
        let Some(arg) = args else {
            return CommandResult::SetTaskFilter(ctx.task_filter.next());
        };
        TaskFilter::all()
            .iter()
            .find(|f| f.name() == arg)
            .map_or_else(|| usage_error(self), |f| CommandResult::SetTaskFilter(*f))
    }
}

pub struct TagCommand;

impl SlashCommand for TagCommand {
    fn name(&self) -> &'static str {
        "tag"
    }

    fn usage(&self) -> &'static str {
        "/tag [name]"
    }

    fn description(&self) -> &'static str {
        "Show only messages with a tag; no name clears it"
    }

    fn execute(&self, args: Option<&str>, _ctx: &CommandContext) -> CommandResult {
        CommandResult::SelectTag(args.map(|t| t.trim_start_matches('#').to_string()))
    }
}

pub struct AddTagCommand;

impl SlashCommand for AddTagCommand {
    fn name(&self) -> &'static str {
        "addtag"
    }

    fn usage(&self) -> &'static str {
        "/addtag <name>"
    }

    fn description(&self) -> &'static str {
        "Add a tag to the selected message"
    }

    fn execute(&self, args: Option<&str>, _ctx: &CommandContext) -> CommandResult {
        match args.map(|t| t.trim_start_matches('#')) {
            Some(tag) if !tag.is_empty() && !tag.contains(char::is_whitespace) => {
                CommandResult::AddTag(tag.to_string())
            }
            _ => usage_error(self),
        }
    }

    fn can_execute(&self, ctx: &CommandContext) -> bool {
        ctx.has_selection
    }
}

// =============================================================================
// Search
// =============================================================================

pub struct SearchCommand;

impl SlashCommand for SearchCommand {
    fn name(&self) -> &'static str {
        "search"
    }

    fn usage(&self) -> &'static str {
        "/search <term>"
    }

    fn description(&self) -> &'static str {
        "Search content and tags"
    }

    fn execute(&self, args: Option<&str>, _ctx: &CommandContext) -> CommandResult {
        CommandResult::Search(args.unwrap_or_default().to_string())
    }
}

pub struct SearchTagCommand;

impl SlashCommand for SearchTagCommand {
    fn name(&self) -> &'static str {
        "search-tag"
    }

    fn usage(&self) -> &'static str {
        "/search-tag [tag ...]"
    }

    fn description(&self) -> &'static str {
        "Require any of these tags in search results"
    }

    fn execute(&self, args: Option<&str>, ctx: &CommandContext) -> CommandResult {
        let tags = args
            .unwrap_or_default()
            .split_whitespace()
            .map(|t| t.trim_start_matches('#'))
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect();
        CommandResult::SetSearchOptions(ctx.search_options.clone().with_tags(tags))
    }
}

pub struct SearchFromCommand;

impl SlashCommand for SearchFromCommand {
    fn name(&self) -> &'static str {
        "search-from"
    }

    fn usage(&self) -> &'static str {
        "/search-from [YYYY-MM-DD]"
    }

    fn description(&self) -> &'static str {
        "Only messages created on or after this day"
    }

    fn execute(&self, args: Option<&str>, ctx: &CommandContext) -> CommandResult {
        match args.map(parse_day) {
            None => CommandResult::SetSearchOptions(ctx.search_options.clone().with_date_from(None)),
            Some(Some(day)) => {
                CommandResult::SetSearchOptions(ctx.search_options.clone().with_date_from(Some(day)))
            }
            Some(None) => usage_error(self),
        }
    }
}

pub struct SearchToCommand;

impl SlashCommand for SearchToCommand {
    fn name(&self) -> &'static str {
        "search-to"
    }

    fn usage(&self) -> &'static str {
        "/search-to [YYYY-MM-DD]"
    }

    fn description(&self) -> &'static str {
        "Only messages created on or before this day"
    }

    fn execute(&self, args: Option<&str>, ctx: &CommandContext) -> CommandResult {
        match args.map(parse_day) {
            None => CommandResult::SetSearchOptions(ctx.search_options.clone().with_date_to(None)),
            Some(Some(day)) => {
                CommandResult::SetSearchOptions(ctx.search_options.clone().with_date_to(Some(day)))
            }
            Some(None) => usage_error(self),
        }
    }
}

pub struct SearchCaseCommand;

impl SlashCommand for SearchCaseCommand {
    fn name(&self) -> &'static str {
        "search-case"
    }

    fn usage(&self) -> &'static str {
        "/search-case [on|off]"
    }

    fn description(&self) -> &'static str {
        "Toggle case-sensitive term matching"
    }

    fn execute(&self, args: Option<&str>, ctx: &CommandContext) -> CommandResult {
        let value = match args {
            None => Some(!ctx.search_options.case_sensitive),
            Some(arg) => parse_switch(arg),
        };
        value.map_or_else(
            || usage_error(self),
            |on| CommandResult::SetSearchOptions(ctx.search_options.clone().with_case_sensitive(on)),
        )
    }
}

pub struct SearchInCommand;

impl SlashCommand for SearchInCommand {
    fn name(&self) -> &'static str {
        "search-in"
    }

    fn usage(&self) -> &'static str {
        "/search-in <content|tags|both>"
    }

    fn description(&self) -> &'static str {
        "Choose where the search term is matched"
    }

    fn execute(&self, args: Option<&str>, ctx: &CommandContext) -> CommandResult {
        let (in_content, in_tags) = match args {
            Some("content") => (true, false),
            Some("tags") => (false, true),
            Some("both") => (true, true),
            _ => return usage_error(self),
        };
        CommandResult::SetSearchOptions(
            ctx.search_options
                .clone()
                .with_in_content(in_content)
                .with_in_tags(in_tags),
        )
    }
}

pub struct ClearSearchCommand;

impl SlashCommand for ClearSearchCommand {
    fn name(&self) -> &'static str {
        "clear-search"
    }

    fn usage(&self) -> &'static str {
        "/clear-search"
    }

    fn description(&self) -> &'static str {
        "Reset the search term, options and results"
    }

    fn execute(&self, _args: Option<&str>, _ctx: &CommandContext) -> CommandResult {
        CommandResult::ClearSearch
    }
}

// =============================================================================
// Composer and app
// =============================================================================

pub struct ImageCommand;

impl SlashCommand for ImageCommand {
    fn name(&self) -> &'static str {
        "image"
    }

    fn usage(&self) -> &'static str {
        "/image <path ...> | /image clear"
    }

    fn description(&self) -> &'static str {
        "Attach images to the next message"
    }

    fn execute(&self, args: Option<&str>, _ctx: &CommandContext) -> CommandResult {
        match args {
            None => usage_error(self),
            Some("clear") => CommandResult::ClearImages,
            Some(paths) => {
                CommandResult::AttachImages(paths.split_whitespace().map(PathBuf::from).collect())
            }
        }
    }
}

pub struct SidebarCommand;

impl SlashCommand for SidebarCommand {
    fn name(&self) -> &'static str {
        "sidebar"
    }

    fn usage(&self) -> &'static str {
        "/sidebar"
    }

    fn description(&self) -> &'static str {
        "Show or hide the sidebar"
    }

    fn execute(&self, _args: Option<&str>, _ctx: &CommandContext) -> CommandResult {
        CommandResult::ToggleSidebar
    }
}

pub struct HelpCommand;

impl SlashCommand for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn usage(&self) -> &'static str {
        "/help"
    }

    fn description(&self) -> &'static str {
        "List commands and key bindings"
    }

    fn execute(&self, _args: Option<&str>, _ctx: &CommandContext) -> CommandResult {
        CommandResult::ShowHelp
    }
}

pub struct ExitCommand;

impl SlashCommand for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn usage(&self) -> &'static str {
        "/exit"
    }

    fn description(&self) -> &'static str {
        "Exit the application"
    }

    fn execute(&self, _args: Option<&str>, _ctx: &CommandContext) -> CommandResult {
        CommandResult::Exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn run(input: &str, options: &SearchOptions) -> CommandResult {
        let registry = CommandRegistry::with_builtins();
        let ctx = CommandContext {
            archive_filter: ArchiveFilter::Unarchived,
            task_filter: TaskFilter::All,
            search_options: options,
            has_selection: false,
        };
        let mut parts = input.splitn(2, ' ');
        let name = parts.next().unwrap_or_default();
        registry.dispatch(name, parts.next(), &ctx)
    }

    #[test]
    fn builtin_names_are_unique() {
        let registry = CommandRegistry::with_builtins();
        let mut names: Vec<_> = registry.all().iter().map(|c| c.name()).collect();
        let count = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), count);
    }

    #[test]
    fn matching_by_prefix() {
        let registry = CommandRegistry::with_builtins();
        let names: Vec<_> = registry.matching("search-").iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["search-tag", "search-from", "search-to", "search-case", "search-in"]
        );
    }

    #[test]
    fn unknown_command_is_an_error() {
        let result = run("frobnicate", &SearchOptions::default());
        assert_eq!(
            result,
            CommandResult::Error("Unknown command: /frobnicate".to_string())
        );
    }

    #[test]
    fn channel_requires_a_name() {
        let options = SearchOptions::default();
        assert!(matches!(run("channel", &options), CommandResult::Error(_)));
        assert_eq!(
            run("channel Work notes", &options),
            CommandResult::CreateChannel("Work notes".to_string())
        );
    }

    #[test]
    fn selectors_cycle_without_arguments() {
        let options = SearchOptions::default();
        assert_eq!(
            run("archive", &options),
            CommandResult::SetArchiveFilter(ArchiveFilter::All)
        );
        assert_eq!(
            run("tasks", &options),
            CommandResult::SetTaskFilter(TaskFilter::Tasks)
        );
        assert_eq!(
            run("tasks completed-tasks", &options),
            CommandResult::SetTaskFilter(TaskFilter::CompletedTasks)
        );
        assert!(matches!(run("tasks bogus", &options), CommandResult::Error(_)));
    }

    #[test]
    fn tag_strips_hash_and_clears_without_argument() {
        let options = SearchOptions::default();
        assert_eq!(
            run("tag #work", &options),
            CommandResult::SelectTag(Some("work".to_string()))
        );
        assert_eq!(run("tag", &options), CommandResult::SelectTag(None));
    }

    #[test]
    fn addtag_needs_a_selected_message() {
        let result = run("addtag idea", &SearchOptions::default());
        assert_eq!(
            result,
            CommandResult::Error("/addtag is not available here".to_string())
        );
    }

    #[test]
    fn search_option_commands_replace_the_whole_struct() {
        let current = SearchOptions::default().with_case_sensitive(true);

        let CommandResult::SetSearchOptions(tags) = run("search-tag #a b", &current) else {
            panic!("expected options");
        };
        assert_eq!(tags.tags, vec!["a", "b"]);
        assert!(tags.case_sensitive);

        let CommandResult::SetSearchOptions(from) = run("search-from 2024-05-01", &current) else {
            panic!("expected options");
        };
        assert_eq!(
            from.date_from,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );

        assert!(matches!(
            run("search-to yesterday", &current),
            CommandResult::Error(_)
        ));

        let CommandResult::SetSearchOptions(case) = run("search-case", &current) else {
            panic!("expected options");
        };
        assert!(!case.case_sensitive);

        let CommandResult::SetSearchOptions(scope) = run("search-in tags", &current) else {
            panic!("expected options");
        };
        assert!(!scope.in_content && scope.in_tags);
    }

    #[test]
    fn image_paths_are_split_on_whitespace() {
        let options = SearchOptions::default();
        assert_eq!(
            run("image a.png b.jpg", &options),
            CommandResult::AttachImages(vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")])
        );
        assert_eq!(run("image clear", &options), CommandResult::ClearImages);
    }
}
