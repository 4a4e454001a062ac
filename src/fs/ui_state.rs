//! Persistence of UI selector and search state.
//!
//! Each selector lives under its own key. Selector enums are stored by their
//! string names so that unknown or legacy values degrade to defaults instead
//! of failing the whole load.

use crate::app::state::{SearchState, UiState};
use crate::core::filter::{ArchiveFilter, TaskFilter};
use crate::core::search::SearchOptions;
use crate::fs::storage::{KeyValueStore, keys, load_or_default, persist};

/// List selectors as stored between sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSelectors {
    /// `"all"`, `"unarchived"` or legacy `"archived"`.
    pub archive_filter: String,
    /// `"all"`, `"tasks"`, `"completed-tasks"` or `"uncompleted-tasks"`.
    pub task_filter: String,
    pub selected_tag: Option<String>,
    pub active_thread_id: Option<String>,
    pub is_sidebar_visible: bool,
}

impl Default for PersistedSelectors {
    fn default() -> Self {
        Self {
            archive_filter: ArchiveFilter::default().name().to_string(),
            task_filter: TaskFilter::default().name().to_string(),
            selected_tag: None,
            active_thread_id: None,
            is_sidebar_visible: true,
        }
    }
}

impl From<&UiState> for PersistedSelectors {
    fn from(state: &UiState) -> Self {
        Self {
            archive_filter: state.archive_filter.name().to_string(),
            task_filter: state.task_filter.name().to_string(),
            selected_tag: state.selected_tag.clone(),
            active_thread_id: state.active_thread_id.clone(),
            is_sidebar_visible: state.is_sidebar_visible,
        }
    }
}

impl PersistedSelectors {
    /// Loads every selector key, substituting defaults individually.
    #[must_use]
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();
        Self {
            archive_filter: load_or_default(store, keys::ARCHIVE_FILTER, defaults.archive_filter),
            task_filter: load_or_default(store, keys::TASK_FILTER, defaults.task_filter),
            selected_tag: load_or_default(store, keys::SELECTED_TAG, None),
            active_thread_id: load_or_default(store, keys::ACTIVE_THREAD_ID, None),
            is_sidebar_visible: load_or_default(
                store,
                keys::IS_SIDEBAR_VISIBLE,
                defaults.is_sidebar_visible,
            ),
        }
    }

    /// Writes every selector key. Failures are logged, not returned.
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        persist(store, keys::ARCHIVE_FILTER, &self.archive_filter);
        persist(store, keys::TASK_FILTER, &self.task_filter);
        persist(store, keys::SELECTED_TAG, &self.selected_tag);
        persist(store, keys::ACTIVE_THREAD_ID, &self.active_thread_id);
        persist(store, keys::IS_SIDEBAR_VISIBLE, &self.is_sidebar_visible);
    }

    /// Applies the stored values to a live `UiState`.
    pub fn apply_to(&self, state: &mut UiState) {
        state.archive_filter = ArchiveFilter::parse(&self.archive_filter);
        state.task_filter = TaskFilter::parse(&self.task_filter);
        state.selected_tag = self.selected_tag.clone().filter(|t| !t.is_empty());
        state.active_thread_id = self.active_thread_id.clone();
        state.is_sidebar_visible = self.is_sidebar_visible;
    }
}

/// Search session as stored between sessions. Results are recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersistedSearch {
    pub term: String,
    pub is_active: bool,
    pub options: SearchOptions,
}

impl From<&SearchState> for PersistedSearch {
    fn from(state: &SearchState) -> Self {
        Self {
            term: state.term.clone(),
            is_active: state.is_active,
            options: state.options.clone(),
        }
    }
}

impl PersistedSearch {
    #[must_use]
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            term: load_or_default(store, keys::SEARCH_TERM, String::new()),
            is_active: load_or_default(store, keys::IS_SEARCH_ACTIVE, false),
            options: load_or_default(store, keys::SEARCH_OPTIONS, SearchOptions::default()),
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        persist(store, keys::SEARCH_TERM, &self.term);
        persist(store, keys::IS_SEARCH_ACTIVE, &self.is_active);
        persist(store, keys::SEARCH_OPTIONS, &self.options);
    }

    /// Drops every search key from storage.
    pub fn clear(store: &mut dyn KeyValueStore) {
        for key in [keys::SEARCH_TERM, keys::IS_SEARCH_ACTIVE, keys::SEARCH_OPTIONS] {
            if let Err(e) = store.remove(key) {
                tracing::warn!(key, error = %e, "failed to remove persisted search value");
            }
        }
    }
}
