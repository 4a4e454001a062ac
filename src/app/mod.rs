//! Main application state and logic.
//!
//! [`App`] is the composition root: it owns the [`Store`], the list
//! selectors, the search session and the composer, and is handed to the
//! event loop by `main`. Submodules:
//! - `input` - composer operations and wrapping
//! - `events` - key and paste handling
//! - `render` - drawing the main screen
//! - `slash_commands` - parsing and dispatching `/commands`
//! - `state` - plain state structures
//!
//! ## Panes
//!
//! - **List**: root messages of the active channel narrowed by the archive,
//!   task and tag selectors, or the search results while a search is active.
//! - **Thread**: the open thread's parent and replies. New messages are
//!   posted as replies while it is open.
//! - **Sidebar**: channels, tags and the selectors, toggled with `/sidebar`.

pub mod events;
mod input;
mod layout;
mod render;
pub mod slash_commands;
pub mod state;

#[cfg(test)]
mod tests;

pub use input::{ComposerWrap, VisualRow, wrap_composer};
pub use layout::{COMPOSER_HEIGHT, MainLayout, SIDEBAR_WIDTH, calculate_main_layout};

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::core::search::has_criteria;
use crate::core::{
    ArchiveFilter, CommandRegistry, CommandResult, MessageWithThreadInfo, Store,
    TaskFilter, ThreadView, root_messages, search_messages, with_thread_info,
};
use crate::fs::{DataPaths, PersistedSearch, PersistedSelectors};
use crate::media::{self, BatchOutcome, MAX_IMAGES_PER_MESSAGE};
use crate::tui::Theme;
use crate::tui::widgets::{MessageRow, row_extents};

pub use self::slash_commands::parse_slash_command;
pub use self::state::{
    AppEvent, ComposerState, Highlight, LayoutState, ScrollState, SearchState, StatusKind,
    StatusLine, UiState,
};

/// Channel buffer size for background events.
const EVENT_CHANNEL_SIZE: usize = 64;

/// Which pane keyboard selection moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    List,
    Thread,
}

/// Main application state.
pub struct App {
    /// Messages, channels and their persistence.
    pub(crate) store: Store,
    /// List selectors, open thread, sidebar.
    pub(crate) ui: UiState,
    pub(crate) search: SearchState,
    pub(crate) composer: ComposerState,
    /// Message the keyboard actions apply to.
    pub(crate) selected_id: Option<String>,
    pub(crate) status: Option<StatusLine>,
    /// Emphasis on the message just created.
    pub(crate) highlight: Option<Highlight>,
    pub(crate) list_scroll: ScrollState,
    pub(crate) thread_scroll: ScrollState,
    pub(crate) layout: LayoutState,
    pub(crate) theme: Theme,
    pub(crate) show_help: bool,
    should_quit: bool,

    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,

    /// Registry of available slash commands.
    pub(crate) command_registry: CommandRegistry,
}

impl App {
    /// Opens the data directory and restores the previous session.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new(paths: &DataPaths) -> Result<Self> {
        paths
            .ensure_dirs()
            .with_context(|| format!("failed to prepare {}", paths.base().display()))?;
        let store = Store::open(Box::new(paths.open_store()));
        Ok(Self::new_with_store(store))
    }

    /// Builds the application around an already loaded store.
    ///
    /// Persisted selectors and search state are read from the store's
    /// backend. An active search is re-run and a thread id that no longer
    /// resolves is dropped.
    #[must_use]
    pub fn new_with_store(store: Store) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);

        let mut ui = UiState::default();
        PersistedSelectors::load(store.backend()).apply_to(&mut ui);
        let persisted_search = PersistedSearch::load(store.backend());

        let mut app = Self {
            store,
            ui,
            search: SearchState {
                term: persisted_search.term,
                options: persisted_search.options,
                results: Vec::new(),
                is_active: persisted_search.is_active,
            },
            composer: ComposerState::default(),
            selected_id: None,
            status: None,
            highlight: None,
            list_scroll: ScrollState::new(),
            thread_scroll: ScrollState::new(),
            layout: LayoutState::default(),
            theme: Theme::default(),
            show_help: false,
            should_quit: false,
            event_rx,
            event_tx,
            command_registry: CommandRegistry::with_builtins(),
        };

        if let Some(thread_id) = app.ui.active_thread_id.clone()
            && app.store.message_by_id(&thread_id).is_none()
        {
            tracing::warn!(thread = %thread_id, "persisted thread not found, closing it");
            app.ui.active_thread_id = None;
            app.save_selectors();
        }
        if app.search.is_active {
            app.perform_search();
        }

        tracing::info!(
            channel = app.store.active_channel_id(),
            search = app.search.is_active,
            "session restored"
        );
        app
    }

    /// Returns true if the application should quit.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub const fn ui(&self) -> &UiState {
        &self.ui
    }

    #[must_use]
    pub const fn search_state(&self) -> &SearchState {
        &self.search
    }

    #[must_use]
    pub fn composer_text(&self) -> &str {
        self.composer.editor.text()
    }

    #[must_use]
    pub fn pending_images(&self) -> &[String] {
        &self.composer.pending_images
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    #[must_use]
    pub const fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    #[must_use]
    pub const fn is_help_visible(&self) -> bool {
        self.show_help
    }

    /// Id of the message that is still emphasised at `now`.
    #[must_use]
    pub fn highlighted_id(&self, now: Instant) -> Option<&str> {
        self.highlight
            .as_ref()
            .filter(|h| h.is_live_at(now))
            .map(|h| h.message_id.as_str())
    }

    /// Gets a sender for background tasks.
    #[must_use]
    pub fn event_sender(&self) -> mpsc::Sender<AppEvent> {
        self.event_tx.clone()
    }

    /// Calculates and caches the layout for this frame, then clamps both
    /// panes' scroll offsets to their content.
    ///
    /// Should be called once per frame before rendering.
    pub fn update_layout(&mut self, terminal_area: Rect) {
        self.layout.main = calculate_main_layout(
            terminal_area,
            self.ui.is_sidebar_visible,
            self.ui.active_thread_id.is_some(),
        );
        for pane in [Pane::List, Pane::Thread] {
            let (width, height) = self.pane_metrics(pane);
            let content = self.pane_content_height(pane, width);
            self.scroll_for(pane).settle(content, height);
        }
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// The main list: filtered root messages with their reply counts.
    #[must_use]
    pub fn visible_messages(&self) -> Vec<MessageWithThreadInfo> {
        let filtered = self.store.filter_messages(
            self.ui.archive_filter,
            self.ui.task_filter,
            self.ui.selected_tag.as_deref(),
        );
        with_thread_info(root_messages(filtered), self.store.messages())
    }

    /// The open thread, if any.
    #[must_use]
    pub fn thread_view(&self) -> Option<ThreadView<'_>> {
        self.ui
            .active_thread_id
            .as_deref()
            .map(|id| ThreadView::build(self.store.messages(), id))
    }

    /// What the list pane shows: search results while searching.
    #[must_use]
    pub fn list_messages(&self) -> Vec<MessageWithThreadInfo> {
        if self.search.is_active {
            self.search.results.clone()
        } else {
            self.visible_messages()
        }
    }

    /// Pane that selection currently moves through.
    #[must_use]
    pub const fn focused_pane(&self) -> Pane {
        if self.ui.active_thread_id.is_some() {
            Pane::Thread
        } else {
            Pane::List
        }
    }

    fn navigable_ids(&self) -> Vec<String> {
        match self.thread_view() {
            Some(thread) => thread
                .parent
                .into_iter()
                .chain(thread.replies)
                .map(|m| m.id.clone())
                .collect(),
            None => self.list_messages().into_iter().map(|m| m.message.id).collect(),
        }
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    fn save_selectors(&mut self) {
        PersistedSelectors::from(&self.ui).save(self.store.backend_mut());
    }

    /// Sets the archive filter. Clears the tag selector.
    pub fn set_archive_filter(&mut self, filter: ArchiveFilter) {
        self.ui.archive_filter = filter;
        self.ui.selected_tag = None;
        self.list_scroll.reset();
        self.save_selectors();
    }

    /// Sets the task filter. Clears the tag selector.
    pub fn set_task_filter(&mut self, filter: TaskFilter) {
        self.ui.task_filter = filter;
        self.ui.selected_tag = None;
        self.list_scroll.reset();
        self.save_selectors();
    }

    pub fn select_tag(&mut self, tag: Option<String>) {
        self.ui.selected_tag = tag.filter(|t| !t.is_empty());
        self.list_scroll.reset();
        self.save_selectors();
    }

    /// Opens the thread containing `id`. Replies open their parent's thread.
    pub fn open_thread(&mut self, id: &str) {
        let Some(message) = self.store.message_by_id(id) else {
            return;
        };
        let root = message.parent_id.clone().unwrap_or_else(|| message.id.clone());
        tracing::debug!(thread = %root, "thread opened");
        self.ui.active_thread_id = Some(root.clone());
        self.selected_id = Some(root);
        self.thread_scroll.reset();
        self.save_selectors();
    }

    pub fn close_thread(&mut self) {
        if let Some(root) = self.ui.active_thread_id.take() {
            self.selected_id = Some(root);
            self.save_selectors();
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.ui.is_sidebar_visible = !self.ui.is_sidebar_visible;
        self.save_selectors();
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Runs the search over every message with the current term and options.
    ///
    /// Without any criteria the results are cleared and the search goes
    /// inactive.
    pub fn perform_search(&mut self) {
        if has_criteria(&self.search.term, &self.search.options) {
            let found = search_messages(self.store.messages(), &self.search.term, &self.search.options);
            self.search.results = with_thread_info(found, self.store.messages());
            self.search.is_active = true;
        } else {
            self.search.results.clear();
            self.search.is_active = false;
        }
        tracing::debug!(
            term = %self.search.term,
            results = self.search.results.len(),
            active = self.search.is_active,
            "search performed"
        );
        self.list_scroll.reset();
        PersistedSearch::from(&self.search).save(self.store.backend_mut());
    }

    /// Resets term, options and results and forgets the stored search.
    pub fn clear_search(&mut self) {
        self.search = SearchState::default();
        self.list_scroll.reset();
        PersistedSearch::clear(self.store.backend_mut());
    }

    /// Recomputes results after the collection changed.
    fn refresh_search(&mut self) {
        if self.search.is_active {
            let found = search_messages(self.store.messages(), &self.search.term, &self.search.options);
            self.search.results = with_thread_info(found, self.store.messages());
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Moves the selection one message down, or selects the last message.
    pub fn select_next(&mut self) {
        self.move_selection(1);
    }

    /// Moves the selection one message up, or selects the last message.
    pub fn select_previous(&mut self) {
        self.move_selection(-1);
    }

    fn move_selection(&mut self, step: isize) {
        let ids = self.navigable_ids();
        if ids.is_empty() {
            self.selected_id = None;
            return;
        }
        let last = ids.len() - 1;
        let current = self
            .selected_id
            .as_ref()
            .and_then(|id| ids.iter().position(|candidate| candidate == id));
        let index = match current {
            Some(i) => i.saturating_add_signed(step).min(last),
            None => last,
        };
        self.selected_id = Some(ids[index].clone());
        self.scroll_selection_into_view();
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = None;
    }

    fn scroll_selection_into_view(&mut self) {
        let Some(selected) = self.selected_id.clone() else {
            return;
        };
        let pane = self.focused_pane();
        let (width, height) = self.pane_metrics(pane);

        let extents = match pane {
            Pane::Thread => {
                let Some(thread) = self.thread_view() else {
                    return;
                };
                let rows: Vec<MessageRow<'_>> = thread
                    .parent
                    .into_iter()
                    .chain(thread.replies)
                    .map(MessageRow::new)
                    .collect();
                position_extent(&rows, &selected, width)
            }
            Pane::List => {
                let messages = self.list_messages();
                let rows: Vec<MessageRow<'_>> = messages
                    .iter()
                    .map(|m| MessageRow {
                        reply_count: m.reply_count,
                        ..MessageRow::new(&m.message)
                    })
                    .collect();
                position_extent(&rows, &selected, width)
            }
        };

        if let Some((start, end)) = extents {
            let scroll = match pane {
                Pane::List => &mut self.list_scroll,
                Pane::Thread => &mut self.thread_scroll,
            };
            scroll.auto_scroll = false;
            scroll.ensure_visible(start, end, height);
        }
    }

    /// Content width and visible height of a pane's message rows.
    pub(crate) fn pane_metrics(&self, pane: Pane) -> (usize, usize) {
        match (pane, self.layout.main.thread) {
            (Pane::Thread, Some(area)) => (
                area.width.saturating_sub(3) as usize,
                area.height.saturating_sub(2) as usize,
            ),
            _ => (
                self.layout.list_content_width(),
                self.layout.list_visible_height(),
            ),
        }
    }

    pub fn scroll_page_up(&mut self) {
        let pane = self.focused_pane();
        let (_, height) = self.pane_metrics(pane);
        self.scroll_for(pane).page_up(height.max(1));
    }

    pub fn scroll_page_down(&mut self) {
        let pane = self.focused_pane();
        let (width, height) = self.pane_metrics(pane);
        let content = self.pane_content_height(pane, width);
        self.scroll_for(pane).page_down(content, height, height.max(1));
    }

    fn scroll_for(&mut self, pane: Pane) -> &mut ScrollState {
        match pane {
            Pane::List => &mut self.list_scroll,
            Pane::Thread => &mut self.thread_scroll,
        }
    }

    fn pane_content_height(&self, pane: Pane, width: usize) -> usize {
        match pane {
            Pane::Thread => self.thread_view().map_or(0, |thread| {
                let rows: Vec<MessageRow<'_>> = thread
                    .parent
                    .into_iter()
                    .chain(thread.replies)
                    .map(MessageRow::new)
                    .collect();
                crate::tui::widgets::total_height(&rows, width)
            }),
            Pane::List => {
                let messages = self.list_messages();
                let rows: Vec<MessageRow<'_>> = messages
                    .iter()
                    .map(|m| MessageRow {
                        reply_count: m.reply_count,
                        ..MessageRow::new(&m.message)
                    })
                    .collect();
                crate::tui::widgets::total_height(&rows, width)
            }
        }
    }

    // =========================================================================
    // Message actions
    // =========================================================================

    fn after_mutation(&mut self) {
        self.refresh_search();
    }

    /// Archives or unarchives the selected message.
    pub fn toggle_selected_archive(&mut self) {
        let Some(id) = self.selected_id.clone() else {
            self.status = Some(StatusLine::warning("Select a message first"));
            return;
        };
        if self.store.toggle_archive(&id) {
            let archived = self.store.message_by_id(&id).is_some_and(|m| m.is_archived);
            self.status = Some(StatusLine::info(if archived {
                "Message archived"
            } else {
                "Message restored"
            }));
            self.after_mutation();
        }
    }

    /// Marks the selected task done or open again.
    pub fn toggle_selected_completion(&mut self) {
        let Some(id) = self.selected_id.clone() else {
            self.status = Some(StatusLine::warning("Select a message first"));
            return;
        };
        if self.store.toggle_task_completion(&id) {
            self.after_mutation();
        } else {
            self.status = Some(StatusLine::warning("Only tasks can be completed"));
        }
    }

    /// Turns the selected message into a task or back into a note.
    pub fn toggle_selected_task_status(&mut self) {
        let Some(id) = self.selected_id.clone() else {
            self.status = Some(StatusLine::warning("Select a message first"));
            return;
        };
        if self.store.toggle_task_status(&id) {
            self.after_mutation();
        }
    }

    pub fn open_selected_thread(&mut self) {
        match self.selected_id.clone() {
            Some(id) => self.open_thread(&id),
            None => self.status = Some(StatusLine::warning("Select a message first")),
        }
    }

    /// Loads a message into the composer for editing.
    ///
    /// The task marker is written back in front of the content so that
    /// submitting unchanged text keeps the task state.
    pub fn load_for_edit(&mut self, id: &str) {
        let Some(message) = self.store.message_by_id(id) else {
            return;
        };
        let text = crate::core::compose_with_marker(
            &message.content,
            message.is_task,
            message.is_completed,
        );
        let images = message.images.clone().unwrap_or_default();
        self.composer.reset();
        self.composer.editor = crate::editor::Editor::with_text(&text);
        self.composer.pending_images = images;
        self.composer.editing_id = Some(id.to_string());
        self.status = Some(StatusLine::info("Editing message, Esc to cancel"));
    }

    pub fn edit_selected(&mut self) {
        match self.selected_id.clone() {
            Some(id) => self.load_for_edit(&id),
            None => self.status = Some(StatusLine::warning("Select a message first")),
        }
    }

    /// Leaves edit mode, discarding the composer contents.
    pub fn cancel_edit(&mut self) {
        if self.composer.editing_id.is_some() {
            self.composer.reset();
            self.status = None;
        }
    }

    fn add_tag_to_selected(&mut self, tag: &str) {
        let Some(id) = self.selected_id.clone() else {
            self.status = Some(StatusLine::warning("Select a message first"));
            return;
        };
        if self.store.add_tag_to_message(&id, tag) {
            self.status = Some(StatusLine::success(format!("Tagged #{tag}")));
            self.after_mutation();
        } else {
            self.status = Some(StatusLine::info(format!("Already tagged #{tag}")));
        }
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Decodes `paths` off the UI thread and attaches the results when done.
    ///
    /// Without a runtime (unit tests) the batch is processed inline.
    pub fn attach_images(&mut self, paths: Vec<PathBuf>) {
        let room = MAX_IMAGES_PER_MESSAGE.saturating_sub(self.composer.pending_images.len());
        if room == 0 {
            self.status = Some(StatusLine::warning(format!(
                "At most {MAX_IMAGES_PER_MESSAGE} images per message"
            )));
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let tx = self.event_tx.clone();
                handle.spawn(async move {
                    let outcome = media::load_images(paths, room).await;
                    let _ = tx.send(AppEvent::ImagesLoaded(outcome)).await;
                });
                self.status = Some(StatusLine::info("Loading images..."));
            }
            Err(_) => {
                let outcome = media::process_files(&paths, room);
                self.apply_image_batch(outcome);
            }
        }
    }

    /// Merges a finished batch into the pending images.
    ///
    /// Only the image list is touched, so text typed meanwhile survives.
    pub(crate) fn apply_image_batch(&mut self, outcome: BatchOutcome) {
        let BatchOutcome {
            images,
            errors,
            skipped,
        } = outcome;
        let offered = images.len();
        let dropped = media::merge_pending(&mut self.composer.pending_images, images);
        let attached = offered - dropped;
        if attached > 0 {
            self.composer.images_changed = true;
        }

        self.status = Some(if let Some(first) = errors.first() {
            let more = errors.len() - 1;
            let text = if more > 0 {
                format!("{first} (+{more} more)")
            } else {
                first.to_string()
            };
            StatusLine::error(text)
        } else if dropped > 0 {
            StatusLine::warning(format!(
                "{dropped} image(s) dropped, at most {MAX_IMAGES_PER_MESSAGE} per message"
            ))
        } else if attached > 0 {
            StatusLine::success(format!("Attached {attached} image(s)"))
        } else if !skipped.is_empty() {
            StatusLine::warning("No images found in the selected files")
        } else {
            StatusLine::info("No images attached")
        });
    }

    pub fn clear_images(&mut self) {
        self.composer.pending_images.clear();
        self.composer.images_changed = true;
        self.status = Some(StatusLine::info("Images cleared"));
    }

    // =========================================================================
    // Background events
    // =========================================================================

    /// Drains events sent by background tasks.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::ImagesLoaded(outcome) => self.apply_image_batch(outcome),
            }
        }
    }

    /// Periodic housekeeping: expires the new-message emphasis.
    pub fn tick(&mut self) {
        if self
            .highlight
            .as_ref()
            .is_some_and(|h| !h.is_live_at(Instant::now()))
        {
            self.highlight = None;
        }
    }

    // =========================================================================
    // Slash command results
    // =========================================================================

    pub(crate) fn handle_command_result(&mut self, result: CommandResult) {
        match result {
            CommandResult::Exit => {
                tracing::info!("exit requested");
                self.should_quit = true;
            }
            CommandResult::ShowHelp => self.show_help = true,
            CommandResult::CreateChannel(name) => match self.store.add_channel(&name) {
                Ok(channel) => {
                    if let Err(e) = self.store.set_active_channel(&channel.id) {
                        self.status = Some(StatusLine::error(e.to_string()));
                        return;
                    }
                    self.on_channel_changed();
                    self.status = Some(StatusLine::success(format!("Created #{}", channel.name)));
                }
                Err(e) => self.status = Some(StatusLine::error(e.to_string())),
            },
            CommandResult::SwitchChannel(target) => {
                let Some(channel) = self.store.find_channel(&target).cloned() else {
                    self.status = Some(StatusLine::error(format!("Unknown channel `{target}`")));
                    return;
                };
                match self.store.set_active_channel(&channel.id) {
                    Ok(()) => {
                        self.on_channel_changed();
                        self.status = Some(StatusLine::info(format!("Switched to {}", channel.name)));
                    }
                    Err(e) => self.status = Some(StatusLine::error(e.to_string())),
                }
            }
            CommandResult::DeleteChannel(target) => {
                let Some(channel) = self.store.find_channel(&target).cloned() else {
                    self.status = Some(StatusLine::error(format!("Unknown channel `{target}`")));
                    return;
                };
                let was_active = self.store.active_channel_id() == channel.id;
                match self.store.delete_channel(&channel.id) {
                    Ok(()) => {
                        if was_active {
                            self.on_channel_changed();
                        }
                        self.status = Some(StatusLine::info(format!("Deleted {}", channel.name)));
                    }
                    Err(e) => self.status = Some(StatusLine::error(e.to_string())),
                }
            }
            CommandResult::SetArchiveFilter(filter) => {
                self.set_archive_filter(filter);
                self.status = Some(StatusLine::info(format!("Showing {}", filter.label())));
            }
            CommandResult::SetTaskFilter(filter) => {
                self.set_task_filter(filter);
                self.status = Some(StatusLine::info(format!("Showing {}", filter.label())));
            }
            CommandResult::SelectTag(tag) => self.select_tag(tag),
            CommandResult::AddTag(tag) => self.add_tag_to_selected(&tag),
            CommandResult::Search(term) => {
                self.search.term = term;
                self.perform_search();
                self.report_search();
            }
            CommandResult::SetSearchOptions(options) => {
                self.search.options = options;
                self.perform_search();
                self.report_search();
            }
            CommandResult::ClearSearch => {
                self.clear_search();
                self.status = Some(StatusLine::info("Search cleared"));
            }
            CommandResult::AttachImages(paths) => self.attach_images(paths),
            CommandResult::ClearImages => self.clear_images(),
            CommandResult::ToggleSidebar => self.toggle_sidebar(),
            CommandResult::Message(text) => self.status = Some(StatusLine::info(text)),
            CommandResult::Error(text) => self.status = Some(StatusLine::error(text)),
        }
    }

    fn report_search(&mut self) {
        self.status = Some(if self.search.is_active {
            StatusLine::info(format!("{} result(s)", self.search.results.len()))
        } else {
            StatusLine::info("Nothing to search for")
        });
    }

    /// Resets per-channel view state after the active channel changed.
    fn on_channel_changed(&mut self) {
        self.selected_id = None;
        self.list_scroll.reset();
        if self.ui.active_thread_id.take().is_some() {
            self.save_selectors();
        }
    }
}

/// Line extent of the row for message `id`.
fn position_extent(rows: &[MessageRow<'_>], id: &str, width: usize) -> Option<(usize, usize)> {
    let index = rows.iter().position(|r| r.message.id == id)?;
    row_extents(rows, width).get(index).copied()
}
