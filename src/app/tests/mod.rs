//! Tests for the app module.
//!
//! This module is organized into submodules by functionality:
//! - `flow` - Message lifecycle: create, select, archive, threads, edit
//! - `helpers` - Shared test utilities
//! - `input` - Composer keys, paste handling and the command popup
//! - `persistence` - Selector, search and message persistence across sessions
//! - `search` - Search sessions and their results
//! - `ui` - Rendering of the main screen and overlays

#[allow(clippy::unwrap_used, clippy::expect_used)]
pub mod helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod search;
