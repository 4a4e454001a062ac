//! Markdown list structure: continuation, list toggles and indentation.
//!
//! A list item line is optional leading whitespace, a marker (`-`, `*`, `+`
//! or `<digits>.`), exactly one space, then either nothing or content that
//! starts with a non-whitespace character.

use crate::editor::{Selection, Transform};

/// Indentation unit added or removed by indent and outdent.
pub const INDENT: &str = "  ";

/// A list marker as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Dash,
    Star,
    Plus,
    Number(u64),
}

impl Marker {
    /// The marker for the item that follows this one.
    #[must_use]
    pub fn next(&self) -> String {
        match self {
            Self::Dash => "-".to_string(),
            Self::Star => "*".to_string(),
            Self::Plus => "+".to_string(),
            Self::Number(n) => format!("{}.", n.saturating_add(1)),
        }
    }
}

/// A line recognised as a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListItem<'a> {
    pub indent: &'a str,
    pub marker: Marker,
    /// Text after the marker's space; empty for a bare marker.
    pub content: &'a str,
}

/// Parses one line (without its newline) as a list item.
///
/// ```
/// use io_notes::editor::list::{parse_list_item, Marker};
///
/// let item = parse_list_item("  3. third").unwrap();
/// assert_eq!(item.indent, "  ");
/// assert_eq!(item.marker, Marker::Number(3));
/// assert_eq!(item.content, "third");
/// assert!(parse_list_item("-no space").is_none());
/// ```
#[must_use]
pub fn parse_list_item(line: &str) -> Option<ListItem<'_>> {
    let rest = line.trim_start();
    let indent = &line[..line.len() - rest.len()];

    let (marker, after) = if let Some(after) = rest.strip_prefix('-') {
        (Marker::Dash, after)
    } else if let Some(after) = rest.strip_prefix('*') {
        (Marker::Star, after)
    } else if let Some(after) = rest.strip_prefix('+') {
        (Marker::Plus, after)
    } else {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let after = rest[digits..].strip_prefix('.')?;
        let number = rest[..digits].parse().unwrap_or(u64::MAX);
        (Marker::Number(number), after)
    };

    let content = after.strip_prefix(' ')?;
    if content.starts_with(char::is_whitespace) {
        return None;
    }
    Some(ListItem {
        indent,
        marker,
        content,
    })
}

/// Handles a bare line break inside a list.
///
/// Looks only at the text between the start of the cursor's line and the
/// cursor. Returns `None` when the default line break should happen.
#[must_use]
pub fn continue_list(text: &str, selection: Selection) -> Option<Transform> {
    if !selection.is_empty() {
        return None;
    }
    let cursor = selection.head;
    let line_start = line_start(text, cursor);
    let item = parse_list_item(&text[line_start..cursor])?;

    if item.content.is_empty() {
        // Enter on an empty item ends the list.
        let mut out = String::with_capacity(text.len());
        out.push_str(&text[..line_start]);
        out.push_str(&text[cursor..]);
        return Some(Transform {
            text: out,
            selection: Selection::caret(line_start),
        });
    }

    let insertion = format!("\n{}{} ", item.indent, item.marker.next());
    let mut out = String::with_capacity(text.len() + insertion.len());
    out.push_str(&text[..cursor]);
    out.push_str(&insertion);
    out.push_str(&text[cursor..]);
    Some(Transform {
        text: out,
        selection: Selection::caret(cursor + insertion.len()),
    })
}

/// List style applied by the list toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Number,
}

/// A marker found by the toggles: `- ` or `<n>. ` after leading whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ToggleMarker {
    kind: ListKind,
    at: usize,
    len: usize,
}

fn toggle_marker(line: &str) -> Option<ToggleMarker> {
    let rest = line.trim_start();
    let at = line.len() - rest.len();
    if rest.starts_with("- ") {
        return Some(ToggleMarker {
            kind: ListKind::Bullet,
            at,
            len: 2,
        });
    }
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && rest[digits..].starts_with(". ") {
        return Some(ToggleMarker {
            kind: ListKind::Number,
            at,
            len: digits + 2,
        });
    }
    None
}

/// Toggles `kind` on every line the selection touches.
///
/// Lines already in that style lose their marker, lines in the other style
/// are converted, and unmarked lines gain one. Numbers count up from 1
/// across the touched lines.
#[must_use]
pub fn toggle_list(text: &str, selection: Selection, kind: ListKind) -> Transform {
    let edits = line_edits(text, selection, |index, line| {
        let marker = match kind {
            ListKind::Bullet => "- ".to_string(),
            ListKind::Number => format!("{}. ", index + 1),
        };
        Some(match toggle_marker(line) {
            Some(found) if found.kind == kind => LineEdit::remove(found.at, found.len),
            Some(found) => LineEdit {
                at: found.at,
                remove: found.len,
                insert: marker,
            },
            None => LineEdit::insert(line.len() - line.trim_start().len(), marker),
        })
    });
    apply_edits(text, selection, &edits)
}

/// Adds one indent unit to each touched list line.
#[must_use]
pub fn indent(text: &str, selection: Selection) -> Option<Transform> {
    let edits = line_edits(text, selection, |_, line| {
        parse_list_item(line).map(|_| LineEdit::insert(0, INDENT.to_string()))
    });
    (!edits.is_empty()).then(|| apply_edits(text, selection, &edits))
}

/// Removes one indent unit from each touched list line that has one.
#[must_use]
pub fn outdent(text: &str, selection: Selection) -> Option<Transform> {
    let edits = line_edits(text, selection, |_, line| {
        (parse_list_item(line).is_some() && line.starts_with(INDENT))
            .then(|| LineEdit::remove(0, INDENT.len()))
    });
    (!edits.is_empty()).then(|| apply_edits(text, selection, &edits))
}

/// Byte offset of the start of the line containing `offset`.
#[must_use]
pub fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Byte offset of the end of the line containing `offset` (before its newline).
#[must_use]
pub fn line_end(text: &str, offset: usize) -> usize {
    text[offset..].find('\n').map_or(text.len(), |i| offset + i)
}

/// A replacement at an absolute byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineEdit {
    at: usize,
    remove: usize,
    insert: String,
}

impl LineEdit {
    fn insert(at: usize, insert: String) -> Self {
        Self {
            at,
            remove: 0,
            insert,
        }
    }

    fn remove(at: usize, remove: usize) -> Self {
        Self {
            at,
            remove,
            insert: String::new(),
        }
    }
}

/// Runs `edit_line` on each line the selection touches.
///
/// A non-empty selection ending at the start of a line does not touch that
/// line. The callback receives the line's index within the block and the
/// line text; edit offsets it returns are relative to the line.
fn line_edits<F>(text: &str, selection: Selection, mut edit_line: F) -> Vec<LineEdit>
where
    F: FnMut(usize, &str) -> Option<LineEdit>,
{
    let mut last = selection.end();
    if !selection.is_empty() && last > selection.start() && line_start(text, last) == last {
        last -= 1;
    }
    let block_start = line_start(text, selection.start());
    let block_end = line_end(text, last);

    let mut edits = Vec::new();
    let mut offset = block_start;
    for (index, line) in text[block_start..block_end].split('\n').enumerate() {
        if let Some(mut edit) = edit_line(index, line) {
            edit.at += offset;
            edits.push(edit);
        }
        offset += line.len() + 1;
    }
    edits
}

/// Applies ascending, non-overlapping edits and carries the selection along.
fn apply_edits(text: &str, selection: Selection, edits: &[LineEdit]) -> Transform {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for edit in edits {
        out.push_str(&text[last..edit.at]);
        out.push_str(&edit.insert);
        last = edit.at + edit.remove;
    }
    out.push_str(&text[last..]);

    Transform {
        text: out,
        selection: Selection::new(
            remap(selection.anchor, edits),
            remap(selection.head, edits),
        ),
    }
}

fn remap(offset: usize, edits: &[LineEdit]) -> usize {
    let mut mapped = offset;
    for edit in edits {
        if offset >= edit.at + edit.remove {
            mapped = mapped + edit.insert.len() - edit.remove;
        } else if offset > edit.at {
            // Inside removed text: clamp to the end of what replaced it.
            let into = offset - edit.at;
            mapped = mapped - into + into.min(edit.insert.len());
        }
    }
    mapped
}
