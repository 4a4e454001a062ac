//! Thread membership and list decoration.

use std::collections::HashMap;

use crate::core::model::{Message, MessageWithThreadInfo};

/// Counts replies per parent id across the whole collection.
#[must_use]
pub fn reply_counts(messages: &[Message]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for parent in messages.iter().filter_map(|m| m.parent_id.as_deref()) {
        *counts.entry(parent).or_insert(0) += 1;
    }
    counts
}

/// Decorates `subset` with reply facts computed against `all`.
///
/// `subset` is usually a filtered or searched view; replies are still counted
/// over the full collection.
#[must_use]
pub fn with_thread_info<'a, I>(subset: I, all: &[Message]) -> Vec<MessageWithThreadInfo>
where
    I: IntoIterator<Item = &'a Message>,
{
    let counts = reply_counts(all);
    subset
        .into_iter()
        .map(|message| {
            let replies = counts.get(message.id.as_str()).copied().unwrap_or(0);
            MessageWithThreadInfo {
                message: message.clone(),
                has_replies: replies > 0,
                reply_count: (replies > 0).then_some(replies),
            }
        })
        .collect()
}

/// Keeps only thread roots, preserving order.
pub fn root_messages<'a, I>(messages: I) -> impl Iterator<Item = &'a Message>
where
    I: IntoIterator<Item = &'a Message>,
{
    messages.into_iter().filter(|m| m.parent_id.is_none())
}

/// All replies to `parent_id`, in storage order.
#[must_use]
pub fn thread_replies<'m>(messages: &'m [Message], parent_id: &str) -> Vec<&'m Message> {
    messages
        .iter()
        .filter(|m| m.parent_id.as_deref() == Some(parent_id))
        .collect()
}

/// The parent of an open thread and its replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadView<'m> {
    /// `None` when the thread id no longer resolves.
    pub parent: Option<&'m Message>,
    pub replies: Vec<&'m Message>,
}

impl<'m> ThreadView<'m> {
    /// Assembles the thread rooted at `parent_id`.
    #[must_use]
    pub fn build(messages: &'m [Message], parent_id: &str) -> Self {
        Self {
            parent: messages.iter().find(|m| m.id == parent_id),
            replies: thread_replies(messages, parent_id),
        }
    }
}
