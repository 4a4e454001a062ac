//! Free-text and structured search over messages, plus match locating for
//! highlight rendering.
//!
//! Case-insensitive comparison uses a length-preserving fold: each character
//! is lowercased only when its lowercase form is a single character of the
//! same UTF-8 width. Byte offsets found in folded text are therefore valid in
//! the original text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::model::Message;

/// Recognized search options. Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub in_content: bool,
    pub in_tags: bool,
    pub case_sensitive: bool,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            in_content: true,
            in_tags: true,
            case_sensitive: false,
            date_from: None,
            date_to: None,
            tags: Vec::new(),
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub fn with_in_content(mut self, in_content: bool) -> Self {
        self.in_content = in_content;
        self
    }

    #[must_use]
    pub fn with_in_tags(mut self, in_tags: bool) -> Self {
        self.in_tags = in_tags;
        self
    }

    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    #[must_use]
    pub fn with_date_from(mut self, date_from: Option<DateTime<Utc>>) -> Self {
        self.date_from = date_from;
        self
    }

    #[must_use]
    pub fn with_date_to(mut self, date_to: Option<DateTime<Utc>>) -> Self {
        self.date_to = date_to;
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Inclusive upper bound: the last millisecond of `date_to`'s UTC day.
    #[must_use]
    pub fn date_to_end_of_day(&self) -> Option<DateTime<Utc>> {
        self.date_to.map(|date| {
            date.date_naive()
                .and_hms_milli_opt(23, 59, 59, 999)
                .map_or(date, |end| end.and_utc())
        })
    }
}

/// True when the term or any structured constraint is set.
#[must_use]
pub fn has_criteria(term: &str, options: &SearchOptions) -> bool {
    !term.trim().is_empty()
        || !options.tags.is_empty()
        || options.date_from.is_some()
        || options.date_to.is_some()
}

/// Lowercases without changing the byte length of the string.
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.chars()
        .map(|ch| {
            let mut lower = ch.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) if l.len_utf8() == ch.len_utf8() => l,
                _ => ch,
            }
        })
        .collect()
}

fn normalize(text: &str, case_sensitive: bool) -> std::borrow::Cow<'_, str> {
    if case_sensitive {
        std::borrow::Cow::Borrowed(text)
    } else {
        std::borrow::Cow::Owned(fold_case(text))
    }
}

/// Returns the messages matching `term` and the structured options.
///
/// With no criteria at all the result is empty, which distinguishes "no
/// search" from "browse everything".
#[must_use]
pub fn search_messages<'m>(
    messages: &'m [Message],
    term: &str,
    options: &SearchOptions,
) -> Vec<&'m Message> {
    if !has_criteria(term, options) {
        return Vec::new();
    }

    let date_to = options.date_to_end_of_day();
    let has_term = !term.trim().is_empty();
    let needle = normalize(term, options.case_sensitive);

    messages
        .iter()
        .filter(|message| {
            if options.date_from.is_some_and(|from| message.created_at < from) {
                return false;
            }
            if date_to.is_some_and(|to| message.created_at > to) {
                return false;
            }
            // Tag-set filter is always exact and case-sensitive.
            if !options.tags.is_empty()
                && !options.tags.iter().any(|tag| message.tags.contains(tag))
            {
                return false;
            }
            if !has_term {
                return true;
            }

            let content_match = options.in_content
                && normalize(&message.content, options.case_sensitive).contains(needle.as_ref());
            let tag_match = options.in_tags
                && message
                    .tags
                    .iter()
                    .any(|tag| normalize(tag, options.case_sensitive).contains(needle.as_ref()));

            content_match || tag_match
        })
        .collect()
}

/// Byte range of one match inside the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// Locates every occurrence of `term` in `text`, including overlapping ones.
///
/// Each search resumes one character past the previous match's start.
///
/// ```
/// use io_notes::core::search::{find_search_term_positions, MatchSpan};
///
/// let spans = find_search_term_positions("aaa", "aa", false);
/// assert_eq!(spans, vec![MatchSpan { start: 0, end: 2 }, MatchSpan { start: 1, end: 3 }]);
/// ```
#[must_use]
pub fn find_search_term_positions(text: &str, term: &str, case_sensitive: bool) -> Vec<MatchSpan> {
    if term.trim().is_empty() {
        return Vec::new();
    }

    let haystack = normalize(text, case_sensitive);
    let needle = normalize(term, case_sensitive);
    let mut spans = Vec::new();
    let mut from = 0;

    while let Some(offset) = haystack.get(from..).and_then(|rest| rest.find(needle.as_ref())) {
        let start = from + offset;
        spans.push(MatchSpan {
            start,
            end: start + needle.len(),
        });
        let step = haystack[start..].chars().next().map_or(1, char::len_utf8);
        from = start + step;
    }

    spans
}

/// One piece of text for display: either plain or highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

/// Splits `text` into alternating plain and highlighted segments.
///
/// Overlapping matches are merged so no character is emitted twice.
#[must_use]
pub fn highlight_segments<'a>(text: &'a str, term: &str, case_sensitive: bool) -> Vec<Segment<'a>> {
    let spans = find_search_term_positions(text, term, case_sensitive);
    if spans.is_empty() {
        return vec![Segment {
            text,
            highlighted: false,
        }];
    }

    let mut segments = Vec::new();
    let mut last = 0;
    for span in spans {
        if span.start > last {
            segments.push(Segment {
                text: &text[last..span.start],
                highlighted: false,
            });
        }
        let start = span.start.max(last);
        if span.end > start {
            segments.push(Segment {
                text: &text[start..span.end],
                highlighted: true,
            });
        }
        last = last.max(span.end);
    }
    if last < text.len() {
        segments.push(Segment {
            text: &text[last..],
            highlighted: false,
        });
    }

    segments
}
