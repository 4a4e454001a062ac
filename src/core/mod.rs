//! Core note-keeping logic: entities, parsing, filtering, search and threads.

pub mod commands;
pub mod filter;
pub mod model;
pub mod parse;
pub mod search;
pub mod store;
pub mod thread;

pub use commands::{CommandContext, CommandRegistry, CommandResult, SlashCommand};
pub use filter::{ArchiveFilter, MessageFilter, TaskFilter, filter_messages};
pub use model::{
    ALL_CHANNEL_ID, Channel, Clock, IdGenerator, Message, MessageWithThreadInfo, SystemClock,
    UuidGenerator,
};
pub use parse::{ParsedContent, compose_with_marker, extract_tags, parse_content};
pub use search::{
    MatchSpan, SearchOptions, Segment, find_search_term_positions, highlight_segments,
    search_messages,
};
pub use store::{Change, ChannelError, Store};
pub use thread::{ThreadView, root_messages, with_thread_info};
