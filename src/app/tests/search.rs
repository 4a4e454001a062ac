//! Search sessions driven through slash commands.

use ratatui::crossterm::event::KeyCode;

use super::helpers::*;
use crate::app::App;
use crate::fs::{MemoryStore, keys};

fn result_ids(app: &App) -> Vec<&str> {
    app.search_state()
        .results
        .iter()
        .map(|m| m.message.id.as_str())
        .collect()
}

fn seeded() -> App {
    let mut app = create_test_app();
    post(&mut app, "Buy milk #home");
    post(&mut app, "Fix the build #work");
    post(&mut app, "milk the idea #work");
    app
}

#[test]
fn search_command_activates_a_session() {
    let mut app = seeded();
    submit(&mut app, "/search milk");

    let search = app.search_state();
    assert!(search.is_active);
    assert_eq!(search.term, "milk");
    assert_eq!(result_ids(&app), vec!["m-1", "m-3"]);
    assert_eq!(app.status().unwrap().text, "2 result(s)");

    // The list shows results instead of the filtered messages.
    let listed: Vec<String> = app.list_messages().into_iter().map(|m| m.message.id).collect();
    assert_eq!(listed, vec!["m-1", "m-3"]);
}

#[test]
fn search_is_case_insensitive_by_default() {
    let mut app = seeded();
    submit(&mut app, "/search BUY");
    assert_eq!(result_ids(&app), vec!["m-1"]);

    submit(&mut app, "/search-case on");
    assert!(app.search_state().options.case_sensitive);
    assert!(result_ids(&app).is_empty());
}

#[test]
fn search_matches_tags_too() {
    let mut app = seeded();
    submit(&mut app, "/search home");
    assert_eq!(result_ids(&app), vec!["m-1"]);

    submit(&mut app, "/search-in content");
    assert!(!app.search_state().options.in_tags);
    // "home" only appears in the content as part of the tag text.
    assert_eq!(result_ids(&app), vec!["m-1"]);

    submit(&mut app, "/search-in tags");
    submit(&mut app, "/search milk");
    assert!(result_ids(&app).is_empty());
}

#[test]
fn empty_search_without_options_stays_inactive() {
    let mut app = seeded();
    submit(&mut app, "/search");

    assert!(!app.search_state().is_active);
    assert!(app.search_state().results.is_empty());
    assert_eq!(app.status().unwrap().text, "Nothing to search for");
    assert_eq!(app.list_messages().len(), 3);
}

#[test]
fn tag_filter_alone_activates_the_search() {
    let mut app = seeded();
    submit(&mut app, "/search-tag #work");

    assert!(app.search_state().is_active);
    assert_eq!(app.search_state().term, "");
    assert_eq!(result_ids(&app), vec!["m-2", "m-3"]);

    submit(&mut app, "/search-tag");
    assert!(!app.search_state().is_active);
}

#[test]
fn new_messages_join_the_results() {
    let mut app = seeded();
    submit(&mut app, "/search milk");
    post(&mut app, "more milk");

    assert_eq!(result_ids(&app), vec!["m-1", "m-3", "m-4"]);
}

#[test]
fn mutations_refresh_the_results() {
    let mut app = seeded();
    submit(&mut app, "/search milk");
    app.handle_key(ctrl(KeyCode::Down));
    assert_eq!(app.selected_id(), Some("m-3"));

    app.handle_key(alt(KeyCode::Char('a')));
    let archived = app
        .search_state()
        .results
        .iter()
        .find(|m| m.message.id == "m-3")
        .unwrap();
    assert!(archived.is_archived);
}

#[test]
fn search_covers_every_channel() {
    let mut app = seeded();
    submit(&mut app, "/channel Empty");
    assert!(app.visible_messages().is_empty());

    submit(&mut app, "/search milk");
    assert_eq!(result_ids(&app), vec!["m-1", "m-3"]);
}

#[test]
fn clear_search_resets_the_session_and_storage() {
    let backend = MemoryStore::new();
    let mut app = create_test_app_with_backend(&backend);
    post(&mut app, "milk");
    submit(&mut app, "/search milk");
    assert_eq!(backend.raw(keys::SEARCH_TERM).as_deref(), Some("\"milk\""));
    assert_eq!(backend.raw(keys::IS_SEARCH_ACTIVE).as_deref(), Some("true"));

    submit(&mut app, "/clear-search");
    assert!(!app.search_state().is_active);
    assert_eq!(app.search_state().term, "");
    assert_eq!(app.status().unwrap().text, "Search cleared");
    assert_eq!(backend.raw(keys::SEARCH_TERM), None);
    assert_eq!(backend.raw(keys::IS_SEARCH_ACTIVE), None);
    assert_eq!(backend.raw(keys::SEARCH_OPTIONS), None);
}

#[test]
fn esc_clears_an_active_search() {
    let mut app = seeded();
    submit(&mut app, "/search milk");
    app.handle_key(key(KeyCode::Esc));

    assert!(!app.search_state().is_active);
    assert!(app.status().is_none());
}

#[test]
fn date_range_limits_results() {
    let mut app = seeded();
    submit(&mut app, "/search-from 2024-05-02");
    assert!(app.search_state().is_active);
    assert!(result_ids(&app).is_empty());

    submit(&mut app, "/search-from 2024-05-01");
    assert_eq!(result_ids(&app).len(), 3);
}

#[test]
fn bad_date_is_a_usage_error() {
    let mut app = seeded();
    submit(&mut app, "/search-from yesterday");

    assert_eq!(app.status().unwrap().kind, crate::app::StatusKind::Error);
    assert!(!app.search_state().is_active);
}
