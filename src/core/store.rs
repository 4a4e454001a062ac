//! The authoritative message and channel collections.
//!
//! Every mutating operation ends in [`Store::on_change`], which writes the
//! affected keys to the backing [`KeyValueStore`] and then runs the registered
//! change hooks. Readers get borrowed views; nothing outside the store mutates
//! a [`Message`] or [`Channel`] directly.

use thiserror::Error;

use crate::core::filter::{ArchiveFilter, MessageFilter, TaskFilter, filter_messages};
use crate::core::model::{
    ALL_CHANNEL_ID, Channel, Clock, IdGenerator, Message, SystemClock, UuidGenerator,
};
use crate::core::parse::parse_content;
use crate::core::thread;
use crate::fs::storage::{KeyValueStore, keys, load_or_default, persist, read_json};

/// What part of the store a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Messages,
    Channels,
    ActiveChannel,
    LastAdded,
}

impl Change {
    /// The storage key that holds this part of the store.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Messages => keys::MESSAGES,
            Self::Channels => keys::CHANNELS,
            Self::ActiveChannel => keys::ACTIVE_CHANNEL_ID,
            Self::LastAdded => keys::LAST_ADDED_MESSAGE_ID,
        }
    }
}

/// Callback run after each change has been persisted.
pub type ChangeHook = Box<dyn FnMut(Change) + Send>;

/// Rejected channel operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("channel name must not be empty")]
    EmptyName,
    #[error("`{0}` is reserved and cannot be used as a channel id")]
    ReservedId(String),
    #[error("the `all` channel cannot be deleted")]
    ReservedChannel,
    #[error("unknown channel `{0}`")]
    Unknown(String),
}

/// Messages, channels and the pointers that go with them.
pub struct Store {
    backend: Box<dyn KeyValueStore>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    messages: Vec<Message>,
    channels: Vec<Channel>,
    active_channel_id: String,
    last_added_message_id: Option<String>,
    hooks: Vec<ChangeHook>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("messages", &self.messages.len())
            .field("channels", &self.channels.len())
            .field("active_channel_id", &self.active_channel_id)
            .field("last_added_message_id", &self.last_added_message_id)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Loads the store with production id and time sources.
    #[must_use]
    pub fn open(backend: Box<dyn KeyValueStore>) -> Self {
        Self::load(backend, Box::new(UuidGenerator), Box::new(SystemClock))
    }

    /// Loads the store from `backend`.
    ///
    /// Malformed collections are logged and replaced by empty ones. The
    /// reserved channel is created when missing, and an active channel id
    /// that no longer resolves falls back to it.
    #[must_use]
    pub fn load(
        backend: Box<dyn KeyValueStore>,
        ids: Box<dyn IdGenerator>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let messages: Vec<Message> = load_collection(backend.as_ref(), keys::MESSAGES);
        let channels: Vec<Channel> = load_collection(backend.as_ref(), keys::CHANNELS);
        let active_channel_id = load_or_default(
            backend.as_ref(),
            keys::ACTIVE_CHANNEL_ID,
            ALL_CHANNEL_ID.to_string(),
        );
        let last_added_message_id =
            load_or_default(backend.as_ref(), keys::LAST_ADDED_MESSAGE_ID, None);

        let mut store = Self {
            backend,
            ids,
            clock,
            messages,
            channels,
            active_channel_id,
            last_added_message_id,
            hooks: Vec::new(),
        };

        if !store.channels.iter().any(Channel::is_reserved) {
            let reserved = Channel::reserved(store.clock.now());
            store.channels.insert(0, reserved);
            store.on_change(Change::Channels);
        }
        if store.channel(&store.active_channel_id).is_none() {
            tracing::warn!(
                channel = %store.active_channel_id,
                "persisted active channel not found, reverting to all"
            );
            store.active_channel_id = ALL_CHANNEL_ID.to_string();
            store.on_change(Change::ActiveChannel);
        }

        tracing::info!(
            messages = store.messages.len(),
            channels = store.channels.len(),
            "store loaded"
        );
        store
    }

    /// Registers a hook that runs after every persisted change.
    pub fn add_hook(&mut self, hook: ChangeHook) {
        self.hooks.push(hook);
    }

    /// The persistence backend, shared with UI-state persistence.
    pub fn backend_mut(&mut self) -> &mut dyn KeyValueStore {
        self.backend.as_mut()
    }

    #[must_use]
    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    #[must_use]
    pub fn active_channel_id(&self) -> &str {
        &self.active_channel_id
    }

    #[must_use]
    pub fn last_added_message_id(&self) -> Option<&str> {
        self.last_added_message_id.as_deref()
    }

    /// Persists the part of the store named by `change` and notifies hooks.
    fn on_change(&mut self, change: Change) {
        let key = change.key();
        match change {
            Change::Messages => persist(self.backend.as_mut(), key, &self.messages),
            Change::Channels => persist(self.backend.as_mut(), key, &self.channels),
            Change::ActiveChannel => persist(self.backend.as_mut(), key, &self.active_channel_id),
            Change::LastAdded => persist(self.backend.as_mut(), key, &self.last_added_message_id),
        }
        for hook in &mut self.hooks {
            hook(change);
        }
    }

    // ===== Messages =====

    /// Creates a message in the active channel from raw composer text.
    ///
    /// Callers must not submit empty text without images.
    pub fn create_message(
        &mut self,
        raw: &str,
        images: Vec<String>,
        parent_id: Option<&str>,
    ) -> Message {
        let parsed = parse_content(raw);
        let message = Message {
            id: self.ids.next_id(),
            content: parsed.content,
            created_at: self.clock.now(),
            tags: parsed.tags,
            is_archived: false,
            parent_id: parent_id.map(ToString::to_string),
            is_task: parsed.is_task,
            is_completed: parsed.is_completed,
            channel_id: self.active_channel_id.clone(),
            images: (!images.is_empty()).then_some(images),
        };
        tracing::debug!(
            id = %message.id,
            is_task = message.is_task,
            reply = message.is_reply(),
            "message created"
        );

        self.messages.push(message.clone());
        self.last_added_message_id = Some(message.id.clone());
        self.on_change(Change::Messages);
        self.on_change(Change::LastAdded);
        message
    }

    /// Re-derives content, tags and task state from `text`.
    ///
    /// Completion is recomputed only when the new text is task-marked; plain
    /// text keeps whatever completion flag the message had. `images` of
    /// `None` keeps the current images, `Some(empty)` removes them.
    ///
    /// Returns `false` if no message has `id`.
    pub fn edit_message(&mut self, id: &str, text: &str, images: Option<Vec<String>>) -> bool {
        let Some(message) = self.messages.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        let parsed = parse_content(text);
        message.content = parsed.content;
        message.tags = parsed.tags;
        message.is_task = parsed.is_task;
        if parsed.is_task {
            message.is_completed = parsed.is_completed;
        }
        if let Some(images) = images {
            message.images = (!images.is_empty()).then_some(images);
        }
        tracing::debug!(id, "message edited");
        self.on_change(Change::Messages);
        true
    }

    /// Flips the archived flag.
    pub fn toggle_archive(&mut self, id: &str) -> bool {
        self.update_message(id, |m| {
            m.is_archived = !m.is_archived;
            true
        })
    }

    /// Flips completion. Non-task messages are left alone.
    pub fn toggle_task_completion(&mut self, id: &str) -> bool {
        self.update_message(id, |m| {
            if !m.is_task {
                return false;
            }
            m.is_completed = !m.is_completed;
            true
        })
    }

    /// Flips the task flag and always clears completion.
    pub fn toggle_task_status(&mut self, id: &str) -> bool {
        self.update_message(id, |m| {
            m.is_task = !m.is_task;
            m.is_completed = false;
            true
        })
    }

    /// Appends `tag` unless the message already carries it.
    pub fn add_tag_to_message(&mut self, id: &str, tag: &str) -> bool {
        if tag.is_empty() {
            return false;
        }
        self.update_message(id, |m| {
            if m.tags.iter().any(|t| t == tag) {
                return false;
            }
            m.tags.push(tag.to_string());
            true
        })
    }

    fn update_message(&mut self, id: &str, apply: impl FnOnce(&mut Message) -> bool) -> bool {
        let changed = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .is_some_and(apply);
        if changed {
            tracing::debug!(id, "message updated");
            self.on_change(Change::Messages);
        }
        changed
    }

    /// Every tag once, in first-seen order across the collection.
    #[must_use]
    pub fn all_tags(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.messages
            .iter()
            .flat_map(|m| m.tags.iter())
            .map(String::as_str)
            .filter(|tag| seen.insert(*tag))
            .collect()
    }

    #[must_use]
    pub fn thread_replies(&self, parent_id: &str) -> Vec<&Message> {
        thread::thread_replies(&self.messages, parent_id)
    }

    #[must_use]
    pub fn message_by_id(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Applies the list selectors within the active channel.
    #[must_use]
    pub fn filter_messages(
        &self,
        archive: ArchiveFilter,
        task: TaskFilter,
        tag: Option<&str>,
    ) -> Vec<&Message> {
        let filter = MessageFilter {
            channel_id: &self.active_channel_id,
            archive,
            task,
            tag,
        };
        filter_messages(&self.messages, &filter)
    }

    // ===== Channels =====

    #[must_use]
    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    /// Resolves a channel by id, then by case-insensitive name.
    #[must_use]
    pub fn find_channel(&self, id_or_name: &str) -> Option<&Channel> {
        self.channel(id_or_name).or_else(|| {
            self.channels
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(id_or_name))
        })
    }

    #[must_use]
    pub fn active_channel(&self) -> Option<&Channel> {
        self.channel(&self.active_channel_id)
    }

    /// Creates a user channel with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::EmptyName`] for a blank name, or
    /// [`ChannelError::ReservedId`] if the id source hands out the reserved id.
    pub fn add_channel(&mut self, name: &str) -> Result<Channel, ChannelError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChannelError::EmptyName);
        }
        let id = self.ids.next_id();
        if id == ALL_CHANNEL_ID {
            return Err(ChannelError::ReservedId(id));
        }
        let channel = Channel {
            id,
            name: name.to_string(),
            created_at: self.clock.now(),
        };
        tracing::debug!(id = %channel.id, name = %channel.name, "channel created");
        self.channels.push(channel.clone());
        self.on_change(Change::Channels);
        Ok(channel)
    }

    /// Deletes a user channel. Its messages keep their channel id.
    ///
    /// # Errors
    ///
    /// Refuses the reserved channel and unknown ids.
    pub fn delete_channel(&mut self, id: &str) -> Result<(), ChannelError> {
        if id == ALL_CHANNEL_ID {
            return Err(ChannelError::ReservedChannel);
        }
        let Some(index) = self.channels.iter().position(|c| c.id == id) else {
            return Err(ChannelError::Unknown(id.to_string()));
        };
        self.channels.remove(index);
        tracing::debug!(id, "channel deleted");
        self.on_change(Change::Channels);

        if self.active_channel_id == id {
            self.active_channel_id = ALL_CHANNEL_ID.to_string();
            self.on_change(Change::ActiveChannel);
        }
        Ok(())
    }

    /// Makes `id` the channel new messages are posted into.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Unknown`] if no channel has `id`.
    pub fn set_active_channel(&mut self, id: &str) -> Result<(), ChannelError> {
        if self.channel(id).is_none() {
            return Err(ChannelError::Unknown(id.to_string()));
        }
        if self.active_channel_id != id {
            self.active_channel_id = id.to_string();
            self.on_change(Change::ActiveChannel);
        }
        Ok(())
    }
}

fn load_collection<T: serde::de::DeserializeOwned>(
    backend: &dyn KeyValueStore,
    key: &str,
) -> Vec<T> {
    match read_json(backend, key) {
        Ok(values) => values.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to load persisted collection, starting empty");
            Vec::new()
        }
    }
}
