use super::entry::HistoryEntry;

/// Recall position over a history sequence.
///
/// `position == entries.len()` means the user is on the live input line and is not
/// recalling anything. Index 0 is the oldest entry.
#[derive(Debug, Clone, Default)]
pub struct ScrollCursor {
    position: usize,
    last_match: Option<String>,
}

impl ScrollCursor {
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self {
            position: len,
            last_match: None,
        }
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn last_match(&self) -> Option<&str> {
        self.last_match.as_deref()
    }

    pub fn reset(&mut self, len: usize) {
        self.position = len;
        self.last_match = None;
    }

    /// Moves towards older entries and returns the first one accepted by `prefix`.
    ///
    /// With a non-empty prefix, candidates are skipped when they do not start with
    /// it, equal it, or repeat the previous hit. Running out of entries leaves the
    /// cursor at 0.
    pub fn step_backward(&mut self, entries: &[HistoryEntry], prefix: &str) -> Option<String> {
        self.clamp(entries.len());
        while self.position > 0 {
            self.position -= 1;
            let candidate = command_at(entries, self.position)?;
            if self.accepts(candidate, prefix) {
                self.last_match = Some(candidate.to_string());
                return self.last_match.clone();
            }
        }
        None
    }

    /// Moves towards newer entries; reaching the live line clears the last hit.
    pub fn step_forward(&mut self, entries: &[HistoryEntry], prefix: &str) -> Option<String> {
        self.clamp(entries.len());
        while self.position < entries.len() {
            self.position += 1;
            let Some(candidate) = command_at(entries, self.position) else {
                self.last_match = None;
                return None;
            };
            if self.accepts(candidate, prefix) {
                self.last_match = Some(candidate.to_string());
                return self.last_match.clone();
            }
        }
        None
    }

    pub fn peek_backward_once(&mut self, entries: &[HistoryEntry]) -> Option<String> {
        self.clamp(entries.len());
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        command_at(entries, self.position).map(str::to_string)
    }

    pub fn peek_forward_once(&mut self, entries: &[HistoryEntry]) -> Option<String> {
        self.clamp(entries.len());
        if self.position == entries.len() {
            return None;
        }
        self.position += 1;
        command_at(entries, self.position).map(str::to_string)
    }

    fn accepts(&self, candidate: &str, prefix: &str) -> bool {
        prefix.is_empty()
            || (candidate.starts_with(prefix)
                && candidate != prefix
                && self.last_match.as_deref() != Some(candidate))
    }

    fn clamp(&mut self, len: usize) {
        self.position = self.position.min(len);
    }
}

fn command_at(entries: &[HistoryEntry], index: usize) -> Option<&str> {
    entries.get(index).map(HistoryEntry::command)
}
