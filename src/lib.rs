//! `io-notes` - a terminal notebook.
//!
//! Messages live in channels, can be threaded, tagged and turned into
//! tasks, and are found again through a persistent search session.

pub mod app;
pub mod cli;
pub mod core;
pub mod editor;
pub mod fs;
pub mod logging;
pub mod media;
pub mod tui;
