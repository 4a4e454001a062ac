//! Linear whole-buffer undo history.

/// Snapshots kept before the oldest are dropped.
pub const MAX_SNAPSHOTS: usize = 100;

/// Snapshots of the buffer with a cursor into them.
///
/// Recording after an undo drops every snapshot past the cursor. At most
/// [`MAX_SNAPSHOTS`] are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl History {
    /// Starts a history whose only snapshot is `initial`.
    #[must_use]
    pub fn new(initial: String) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    /// Records a new buffer value after the current snapshot.
    pub fn record(&mut self, text: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(text.to_string());
        if self.entries.len() > MAX_SNAPSHOTS {
            let excess = self.entries.len() - MAX_SNAPSHOTS;
            self.entries.drain(..excess);
        }
        self.index = self.entries.len() - 1;
    }

    /// Steps back one snapshot. `None` at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index).map(String::as_str)
    }

    /// Steps forward one snapshot. `None` at the newest snapshot.
    pub fn redo(&mut self) -> Option<&str> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index).map(String::as_str)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
