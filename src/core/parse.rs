//! Parsing of raw composer text into message fields.
//!
//! Two pieces of mini-syntax live inside free text:
//! - hashtags: `#` followed by one or more characters that are neither
//!   whitespace nor `#`
//! - a leading task marker: `[]` (open task) or `[x]` (completed task)

/// Marker for a new, open task.
pub const OPEN_TASK_MARKER: &str = "[]";

/// Marker for a new, completed task.
pub const DONE_TASK_MARKER: &str = "[x]";

/// Fields derived from raw text at creation or edit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    /// Content with the task marker removed (unchanged when there is none).
    pub content: String,
    pub tags: Vec<String>,
    pub is_task: bool,
    pub is_completed: bool,
}

/// Extracts hashtags left to right.
///
/// Repeated tags are kept; `#` terminates a tag and may start the next one.
///
/// ```
/// use io_notes::core::parse::extract_tags;
///
/// assert_eq!(extract_tags("hello #foo world #bar"), vec!["foo", "bar"]);
/// assert_eq!(extract_tags("#a#b"), vec!["a", "b"]);
/// assert!(extract_tags("no tags here").is_empty());
/// ```
#[must_use]
pub fn extract_tags(text: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        if ch != '#' {
            continue;
        }
        let mut tag = String::new();
        while let Some(&(_, next)) = chars.peek() {
            if next == '#' || next.is_whitespace() {
                break;
            }
            tag.push(next);
            chars.next();
        }
        if !tag.is_empty() {
            tags.push(tag);
        }
    }

    tags
}

/// Which task marker, if any, starts the trimmed text.
#[must_use]
pub fn detect_task_marker(text: &str) -> Option<&'static str> {
    let trimmed = text.trim();
    if trimmed.starts_with(OPEN_TASK_MARKER) {
        Some(OPEN_TASK_MARKER)
    } else if trimmed.starts_with(DONE_TASK_MARKER) {
        Some(DONE_TASK_MARKER)
    } else {
        None
    }
}

/// Derives content, tags and task state from raw composer text.
///
/// Task-marked text is stored trimmed with the marker removed; plain text is
/// stored exactly as typed.
#[must_use]
pub fn parse_content(raw: &str) -> ParsedContent {
    let tags = extract_tags(raw);

    match detect_task_marker(raw) {
        Some(marker) => {
            let content = raw.trim()[marker.len()..].trim().to_string();
            ParsedContent {
                content,
                tags,
                is_task: true,
                is_completed: marker == DONE_TASK_MARKER,
            }
        }
        None => ParsedContent {
            content: raw.to_string(),
            tags,
            is_task: false,
            is_completed: false,
        },
    }
}

/// Rebuilds the text a user would have typed to produce this task state.
///
/// Loading a message into the composer for editing goes through this so that
/// re-submitting unchanged text derives the same task flags.
#[must_use]
pub fn compose_with_marker(content: &str, is_task: bool, is_completed: bool) -> String {
    if !is_task {
        return content.to_string();
    }
    let marker = if is_completed {
        DONE_TASK_MARKER
    } else {
        OPEN_TASK_MARKER
    };
    if content.is_empty() {
        marker.to_string()
    } else {
        format!("{marker} {content}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_scanned_in_order() {
        assert_eq!(extract_tags("hello #foo world #bar"), vec!["foo", "bar"]);
    }

    #[test]
    fn text_without_hash_has_no_tags() {
        assert!(extract_tags("no tags here").is_empty());
    }

    #[test]
    fn hash_terminates_a_tag() {
        assert_eq!(extract_tags("#a#b"), vec!["a", "b"]);
        assert_eq!(extract_tags("##x"), vec!["x"]);
    }

    #[test]
    fn lone_hash_is_not_a_tag() {
        assert!(extract_tags("# heading").is_empty());
        assert!(extract_tags("trailing #").is_empty());
    }

    #[test]
    fn repeated_tags_are_kept() {
        assert_eq!(extract_tags("#dup and #dup"), vec!["dup", "dup"]);
    }

    #[test]
    fn tags_accept_non_ascii() {
        assert_eq!(extract_tags("メモ #日本語 です"), vec!["日本語"]);
    }

    #[test]
    fn tag_stops_at_any_whitespace() {
        assert_eq!(extract_tags("#one\n#two\t#three"), vec!["one", "two", "three"]);
    }

    #[test]
    fn open_task_marker_is_stripped() {
        let parsed = parse_content("[] buy milk");
        assert!(parsed.is_task);
        assert!(!parsed.is_completed);
        assert_eq!(parsed.content, "buy milk");
    }

    #[test]
    fn done_task_marker_is_stripped() {
        let parsed = parse_content("[x] shipped #release");
        assert!(parsed.is_task);
        assert!(parsed.is_completed);
        assert_eq!(parsed.content, "shipped #release");
        assert_eq!(parsed.tags, vec!["release"]);
    }

    #[test]
    fn marker_is_detected_after_leading_whitespace() {
        let parsed = parse_content("   [x]   done   ");
        assert!(parsed.is_completed);
        assert_eq!(parsed.content, "done");
    }

    #[test]
    fn marker_without_space_is_still_a_task() {
        let parsed = parse_content("[]write");
        assert!(parsed.is_task);
        assert_eq!(parsed.content, "write");
    }

    #[test]
    fn plain_text_is_stored_untouched() {
        let parsed = parse_content("  just a note  ");
        assert!(!parsed.is_task);
        assert!(!parsed.is_completed);
        assert_eq!(parsed.content, "  just a note  ");
    }

    #[test]
    fn bracket_in_middle_is_not_a_marker() {
        let parsed = parse_content("see [] later");
        assert!(!parsed.is_task);
    }

    #[test]
    fn task_parsing_round_trip_for_arbitrary_text() {
        for text in ["hello", " spaced ", "#tag only", "multi\nline"] {
            let open = parse_content(&format!("[]{text}"));
            assert!(open.is_task);
            assert!(!open.is_completed);
            assert_eq!(open.content, text.trim());

            let done = parse_content(&format!("[x]{text}"));
            assert!(done.is_completed);
            assert_eq!(done.content, text.trim());
        }
    }

    #[test]
    fn tags_rederived_from_stored_content_match() {
        let parsed = parse_content("[x] ship #v1 #docs");
        assert_eq!(extract_tags(&parsed.content), parsed.tags);
    }

    #[test]
    fn compose_with_marker_restores_task_flags() {
        let text = compose_with_marker("buy milk", true, true);
        assert_eq!(text, "[x] buy milk");
        let parsed = parse_content(&text);
        assert!(parsed.is_task && parsed.is_completed);
        assert_eq!(parsed.content, "buy milk");

        assert_eq!(compose_with_marker("note", false, true), "note");
        assert_eq!(compose_with_marker("", true, false), "[]");
    }
}
