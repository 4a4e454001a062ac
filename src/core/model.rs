//! Entity types shared by the store, the filter and search engines, and the UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id of the pseudo-channel that aggregates every other channel.
pub const ALL_CHANNEL_ID: &str = "all";

/// Display name of the reserved channel when it is auto-created.
pub const ALL_CHANNEL_NAME: &str = "All";

/// A named bucket that messages are posted into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Channel {
    /// Builds the reserved "all" channel.
    #[must_use]
    pub fn reserved(created_at: DateTime<Utc>) -> Self {
        Self {
            id: ALL_CHANNEL_ID.to_string(),
            name: ALL_CHANNEL_NAME.to_string(),
            created_at,
        }
    }

    /// Returns true for the channel that cannot be deleted.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.id == ALL_CHANNEL_ID
    }
}

/// A single note. Replies carry the id of their thread root in `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    /// Text with the leading task marker already stripped.
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Hashtags in scan order. Content-derived tags may repeat.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub is_task: bool,
    /// Only meaningful while `is_task` is set.
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default = "default_channel_id")]
    pub channel_id: String,
    /// Data-URL encoded images; `None` when the message has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

fn default_channel_id() -> String {
    ALL_CHANNEL_ID.to_string()
}

impl Message {
    /// Returns true if this message is a thread reply.
    #[must_use]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Number of attached images.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.as_ref().map_or(0, Vec::len)
    }
}

/// A message decorated with the thread facts the list view needs.
///
/// Never persisted; recomputed from the live collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageWithThreadInfo {
    pub message: Message,
    pub has_replies: bool,
    /// `Some` only when there is at least one reply.
    pub reply_count: Option<usize>,
}

impl std::ops::Deref for MessageWithThreadInfo {
    type Target = Message;

    fn deref(&self) -> &Self::Target {
        &self.message
    }
}

/// Source of fresh opaque identifiers.
pub trait IdGenerator: Send {
    /// Returns an id that has not been handed out before.
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic ids: `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    counter: u64,
}

impl SequentialIds {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            counter: 0,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("{}-{}", self.prefix, self.counter)
    }
}

/// Source of creation timestamps.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn message_serializes_with_camel_case_keys() -> Result<()> {
        let msg = Message {
            id: "m1".to_string(),
            content: "hello".to_string(),
            created_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")?.with_timezone(&Utc),
            tags: vec!["foo".to_string()],
            is_archived: false,
            parent_id: None,
            is_task: true,
            is_completed: false,
            channel_id: "all".to_string(),
            images: None,
        };

        let json = serde_json::to_string(&msg)?;
        assert!(json.contains("\"createdAt\":\"2024-05-01T10:00:00Z\""));
        assert!(json.contains("\"isTask\":true"));
        assert!(json.contains("\"parentId\":null"));
        assert!(!json.contains("images"));
        Ok(())
    }

    #[test]
    fn message_missing_optional_fields_uses_defaults() -> Result<()> {
        let json = r#"{"id":"x","content":"c","createdAt":"2024-01-01T00:00:00.000Z"}"#;
        let msg: Message = serde_json::from_str(json)?;
        assert_eq!(msg.channel_id, ALL_CHANNEL_ID);
        assert!(msg.tags.is_empty());
        assert!(!msg.is_task);
        assert!(msg.parent_id.is_none());
        Ok(())
    }

    #[test]
    fn reserved_channel_is_flagged() {
        let channel = Channel::reserved(Utc::now());
        assert!(channel.is_reserved());
        assert_eq!(channel.name, ALL_CHANNEL_NAME);
    }

    #[test]
    fn uuid_generator_produces_distinct_ids() {
        let mut ids = UuidGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn sequential_ids_count_from_one() {
        let mut ids = SequentialIds::new("m");
        assert_eq!(ids.next_id(), "m-1");
        assert_eq!(ids.next_id(), "m-2");
    }
}
