//! Centralized theme and styling.

use ratatui::style::{Color, Modifier, Style};

/// Application theme with consistent colors and styles.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Accent color for titles, tags and selection.
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    /// Secondary text color.
    pub muted: Color,
    pub border: Color,
    /// Background behind search matches.
    pub match_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::DarkGray,
            border: Color::Gray,
            match_bg: Color::Yellow,
        }
    }
}

impl Theme {
    #[must_use]
    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.fg)
    }

    #[must_use]
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    #[must_use]
    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    #[must_use]
    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    #[must_use]
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    #[must_use]
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for highlighted/selected items.
    #[must_use]
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Search term matches inside message content.
    #[must_use]
    pub fn match_style(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.match_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected text in the composer.
    #[must_use]
    pub fn selection_style(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }

    #[must_use]
    pub fn scrollbar_thumb_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    #[must_use]
    pub fn scrollbar_track_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Placeholder text, visible on both light and dark backgrounds.
    #[must_use]
    pub fn placeholder_style(&self) -> Style {
        Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
    }
}
