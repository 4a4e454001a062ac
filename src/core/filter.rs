//! Selector-driven narrowing of the message collection.
//!
//! Stages run in a fixed order, each narrowing the previous result:
//! channel, archive state, task state, then tag. Input order is preserved.

use crate::core::model::{ALL_CHANNEL_ID, Message};

/// Archive-state selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveFilter {
    /// Archived and unarchived messages alike.
    All,
    /// Only messages that are not archived.
    #[default]
    Unarchived,
    /// Only archived messages. Kept for values persisted by older versions.
    Archived,
}

impl ArchiveFilter {
    /// Returns the persisted name for this selector.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Unarchived => "unarchived",
            Self::Archived => "archived",
        }
    }

    /// Returns the label shown in the sidebar.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => "All messages",
            Self::Unarchived => "Active",
            Self::Archived => "Archived",
        }
    }

    /// Parses a persisted name. Unknown values fall back to the default.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "all" => Self::All,
            "archived" => Self::Archived,
            _ => Self::Unarchived,
        }
    }

    /// Cycles between the two selectors offered in the UI.
    #[must_use]
    pub const fn next(&self) -> Self {
        match self {
            Self::Unarchived => Self::All,
            Self::All | Self::Archived => Self::Unarchived,
        }
    }

    fn keeps(self, message: &Message) -> bool {
        match self {
            Self::All => true,
            Self::Unarchived => !message.is_archived,
            Self::Archived => message.is_archived,
        }
    }
}

/// Task-state selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    /// No task narrowing.
    #[default]
    All,
    /// Every task, completed or not.
    Tasks,
    /// Completed tasks only.
    CompletedTasks,
    /// Open tasks only.
    UncompletedTasks,
}

impl TaskFilter {
    /// Returns the persisted name for this selector.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Tasks => "tasks",
            Self::CompletedTasks => "completed-tasks",
            Self::UncompletedTasks => "uncompleted-tasks",
        }
    }

    /// Returns the label shown in the sidebar.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => "Everything",
            Self::Tasks => "Tasks",
            Self::CompletedTasks => "Completed",
            Self::UncompletedTasks => "Open",
        }
    }

    /// Parses a persisted name. Unknown values fall back to the default.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "tasks" => Self::Tasks,
            "completed-tasks" => Self::CompletedTasks,
            "uncompleted-tasks" => Self::UncompletedTasks,
            _ => Self::All,
        }
    }

    /// Cycles All -> Tasks -> Open -> Completed -> All.
    #[must_use]
    pub const fn next(&self) -> Self {
        match self {
            Self::All => Self::Tasks,
            Self::Tasks => Self::UncompletedTasks,
            Self::UncompletedTasks => Self::CompletedTasks,
            Self::CompletedTasks => Self::All,
        }
    }

    /// Returns all selectors in display order.
    #[must_use]
    pub const fn all() -> &'static [TaskFilter] {
        &[
            TaskFilter::All,
            TaskFilter::Tasks,
            TaskFilter::UncompletedTasks,
            TaskFilter::CompletedTasks,
        ]
    }

    /// True when new submissions should be turned into tasks.
    #[must_use]
    pub const fn is_task_context(&self) -> bool {
        !matches!(self, Self::All)
    }

    fn keeps(self, message: &Message) -> bool {
        match self {
            Self::All => true,
            Self::Tasks => message.is_task,
            Self::CompletedTasks => message.is_task && message.is_completed,
            Self::UncompletedTasks => message.is_task && !message.is_completed,
        }
    }
}

/// The full set of list selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageFilter<'a> {
    pub channel_id: &'a str,
    pub archive: ArchiveFilter,
    pub task: TaskFilter,
    pub tag: Option<&'a str>,
}

impl<'a> MessageFilter<'a> {
    /// A filter that keeps everything in the given channel scope.
    #[must_use]
    pub fn channel(channel_id: &'a str) -> Self {
        Self {
            channel_id,
            archive: ArchiveFilter::All,
            task: TaskFilter::All,
            tag: None,
        }
    }

    /// Returns true if the message survives every stage.
    #[must_use]
    pub fn matches(&self, message: &Message) -> bool {
        (self.channel_id == ALL_CHANNEL_ID || message.channel_id == self.channel_id)
            && self.archive.keeps(message)
            && self.task.keeps(message)
            && self
                .tag
                .is_none_or(|tag| message.tags.iter().any(|t| t == tag))
    }
}

/// Returns the visible subset of `messages`, in input order.
#[must_use]
pub fn filter_messages<'m>(messages: &'m [Message], filter: &MessageFilter<'_>) -> Vec<&'m Message> {
    messages.iter().filter(|m| filter.matches(m)).collect()
}
