//! Rendering methods for the App.
//!
//! - **Main screen**: header, sidebar, message list, thread pane, status,
//!   composer and footer
//! - **Help**: modal overlay listing key bindings and commands

mod help;
mod screen;

use ratatui::Frame;

use super::App;

impl App {
    /// Renders the application UI using the layout cached by
    /// [`App::update_layout`].
    pub fn render(&self, frame: &mut Frame) {
        self.render_main(frame);
        if self.show_help {
            self.render_help(frame);
        }
    }
}
