//! Inline formatting markers.

use crate::editor::{Selection, Transform};

/// Markdown-style inline formats the composer can wrap text in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineFormat {
    Bold,
    Italic,
    Strikethrough,
    Underline,
}

impl InlineFormat {
    /// Opening and closing markers.
    #[must_use]
    pub const fn markers(&self) -> (&'static str, &'static str) {
        match self {
            Self::Bold => ("**", "**"),
            Self::Italic => ("*", "*"),
            Self::Strikethrough => ("~~", "~~"),
            Self::Underline => ("<u>", "</u>"),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Strikethrough => "strikethrough",
            Self::Underline => "underline",
        }
    }
}

/// Wraps the selection in `format`'s markers.
///
/// With no selection an empty pair is inserted and the cursor lands between
/// the markers; otherwise the cursor lands after the closing marker.
#[must_use]
pub fn apply_inline_format(text: &str, selection: Selection, format: InlineFormat) -> Transform {
    let (open, close) = format.markers();
    let (start, end) = (selection.start(), selection.end());
    let selected = &text[start..end];

    let mut out = String::with_capacity(text.len() + open.len() + close.len());
    out.push_str(&text[..start]);
    out.push_str(open);
    out.push_str(selected);
    out.push_str(close);
    out.push_str(&text[end..]);

    let cursor = if selection.is_empty() {
        start + open.len()
    } else {
        start + open.len() + selected.len() + close.len()
    };

    Transform {
        text: out,
        selection: Selection::caret(cursor),
    }
}
