//! Terminal event modes: bracketed paste and the keyboard enhancement
//! protocol, which the composer needs to tell Ctrl/Shift+Enter from Enter.

use std::io::stdout;

use ratatui::crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use ratatui::crossterm::execute;

/// Enables extra terminal event modes and restores them on drop,
/// including during a panic unwind.
pub struct TerminalEventGuard {
    bracketed_paste: bool,
    keyboard_enhancement: bool,
}

impl TerminalEventGuard {
    #[must_use]
    pub fn new() -> Self {
        let bracketed_paste = match execute!(stdout(), EnableBracketedPaste) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "bracketed paste unavailable, pastes arrive as keys");
                false
            }
        };

        let keyboard_enhancement = match execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        ) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "keyboard enhancement unavailable, use Ctrl+S to submit");
                false
            }
        };

        tracing::debug!(bracketed_paste, keyboard_enhancement, "terminal event modes");
        Self {
            bracketed_paste,
            keyboard_enhancement,
        }
    }
}

impl Default for TerminalEventGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalEventGuard {
    fn drop(&mut self) {
        if self.keyboard_enhancement {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        if self.bracketed_paste {
            let _ = execute!(stdout(), DisableBracketedPaste);
        }
    }
}
