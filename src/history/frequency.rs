//! Command frequency index derived from the history sequence.
//!
//! Rebuilt on demand after loads and refreshes; it is never persisted and does not
//! take part in the buffer's invariants.

use std::collections::HashMap;

use super::entry::HistoryEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStats {
    pub count: usize,
    /// Index of the newest entry with this command.
    pub last_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FrequencyMap {
    by_command: HashMap<String, CommandStats>,
}

impl FrequencyMap {
    #[must_use]
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let mut by_command: HashMap<String, CommandStats> = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            by_command
                .entry(entry.command().to_string())
                .and_modify(|stats| {
                    stats.count += 1;
                    stats.last_index = index;
                })
                .or_insert(CommandStats {
                    count: 1,
                    last_index: index,
                });
        }
        Self { by_command }
    }

    #[must_use]
    pub fn count(&self, command: &str) -> usize {
        self.by_command.get(command).map_or(0, |stats| stats.count)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_command.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_command.is_empty()
    }

    /// Up to `limit` commands, most used first; ties go to the more recent one.
    #[must_use]
    pub fn most_frequent(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, CommandStats)> = self
            .by_command
            .iter()
            .map(|(command, stats)| (command.as_str(), *stats))
            .collect();
        ranked.sort_by(|(_, a), (_, b)| {
            b.count
                .cmp(&a.count)
                .then_with(|| b.last_index.cmp(&a.last_index))
        });
        ranked
            .into_iter()
            .take(limit)
            .map(|(command, stats)| (command, stats.count))
            .collect()
    }
}
