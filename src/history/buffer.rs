//! In-memory, size-bounded history that mediates every write to the history file.
//!
//! The whole file is rewritten on each change. That costs O(n) per push, with n
//! bounded by the configured maximum, and keeps the on-disk protocol to a single
//! atomic replace.

use std::path::Path;
use tracing::{debug, error, warn};

use super::cursor::ScrollCursor;
use super::entry::HistoryEntry;
use super::error::{HistoryError, HistoryResult};
use super::frequency::FrequencyMap;
use super::store::{HistoryStore, load_lines};

/// Allowed range for the configurable maximum number of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLimits {
    pub minimum: usize,
    pub maximum: usize,
}

impl LineLimits {
    #[must_use]
    pub const fn new(minimum: usize, maximum: usize) -> Self {
        Self { minimum, maximum }
    }

    #[must_use]
    pub const fn contains(&self, lines: usize) -> bool {
        lines >= self.minimum && lines <= self.maximum
    }

    pub fn validate(&self, lines: usize) -> HistoryResult<()> {
        if self.contains(lines) {
            Ok(())
        } else {
            Err(HistoryError::InvalidArgument(format!(
                "maximum number of lines must be between {} and {}, got {lines}",
                self.minimum, self.maximum
            )))
        }
    }
}

impl Default for LineLimits {
    fn default() -> Self {
        Self::new(10, 1_000_000)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    Uninitialized,
    Initializing,
    Ready,
    /// The last load or refresh failed; the in-memory copy may be stale.
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Blank line or a repeat of the previous command.
    Ignored,
    Appended { evicted: usize },
}

/// How the input widget wants up/down handled. The choice belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecallMode {
    #[default]
    Plain,
    ReverseSearch,
}

#[derive(Debug)]
pub struct HistoryBuffer {
    state: BufferState,
    store: Option<HistoryStore>,
    entries: Vec<HistoryEntry>,
    cursor: ScrollCursor,
    limits: LineLimits,
    maximum_lines: usize,
    persisted_lines: usize,
}

impl HistoryBuffer {
    pub fn new(limits: LineLimits, maximum_lines: usize) -> HistoryResult<Self> {
        limits.validate(maximum_lines)?;
        Ok(Self {
            state: BufferState::Uninitialized,
            store: None,
            entries: Vec::new(),
            cursor: ScrollCursor::new(0),
            limits,
            maximum_lines,
            persisted_lines: 0,
        })
    }

    /// Loads the history file. Only the first successful call has an effect; later
    /// calls return the current state without reloading, so lines pushed in this
    /// session are never discarded.
    pub async fn initialize(&mut self, path: impl AsRef<Path>) -> HistoryResult<BufferState> {
        if self.store.is_some() {
            debug!("History buffer is already initialized, and should only be initialized once");
            return Ok(self.state);
        }

        let store = HistoryStore::new(path.as_ref());
        self.state = BufferState::Initializing;

        let lines = match store.load().await {
            Ok(lines) => lines,
            Err(e) => {
                self.state = BufferState::Degraded;
                return Err(e);
            }
        };

        self.replace_entries(&lines);
        self.store = Some(store);
        self.state = BufferState::Ready;

        if self.entries.len() > self.maximum_lines {
            warn!(
                lines = self.entries.len(),
                maximum = self.maximum_lines,
                "History file is full, consider increasing the maximum number of lines or cleaning it up"
            );
            self.evict_to(self.maximum_lines);
            self.cursor.reset(self.entries.len());
            if let Err(e) = self.persist().await {
                warn!("Could not write the trimmed history back to the file: {e}");
            }
        }

        Ok(self.state)
    }

    /// Records a submitted line and rewrites the history file.
    ///
    /// A failed write is returned as an error but the line stays in memory, so it
    /// can still be recalled for the rest of the session.
    pub async fn push_line(&mut self, text: &str) -> HistoryResult<PushOutcome> {
        if self.store.is_none() {
            return Err(HistoryError::NotInitialized);
        }

        let Some(entry) = HistoryEntry::now(text) else {
            return Ok(PushOutcome::Ignored);
        };
        if self
            .entries
            .last()
            .is_some_and(|last| last.command() == entry.command())
        {
            return Ok(PushOutcome::Ignored);
        }

        self.entries.push(entry);
        let evicted = self.evict_to(self.maximum_lines);
        self.cursor.reset(self.entries.len());

        self.persist().await?;
        Ok(PushOutcome::Appended { evicted })
    }

    /// Number of lines to keep so that `percent` of the current history remains,
    /// rounded up.
    pub fn lines_for_percentage(&self, percent: u8) -> HistoryResult<usize> {
        if percent > 100 {
            return Err(HistoryError::InvalidArgument(format!(
                "percentage of lines to keep must be between 0 and 100, got {percent}"
            )));
        }
        Ok((self.entries.len() * usize::from(percent)).div_ceil(100))
    }

    /// Drops the oldest entries until `count` remain, then rewrites the file.
    /// Returns the number of entries removed.
    pub async fn trim_to_count(&mut self, count: usize) -> HistoryResult<usize> {
        if count > self.maximum_lines {
            return Err(HistoryError::InvalidArgument(format!(
                "number of lines to keep must be between 0 and {}, got {count}",
                self.maximum_lines
            )));
        }
        self.writable_store()?;

        let removed = self.evict_to(count);
        self.cursor.reset(self.entries.len());
        self.persist().await?;
        Ok(removed)
    }

    /// Changes the maximum and trims the history if it no longer fits.
    /// Returns the number of entries removed.
    pub async fn set_maximum_lines(&mut self, maximum: usize) -> HistoryResult<usize> {
        self.limits.validate(maximum)?;
        if self.entries.len() > maximum {
            self.writable_store()?;
        } else if self.store.is_none() {
            return Err(HistoryError::NotInitialized);
        }

        self.maximum_lines = maximum;
        debug!(maximum, "New maximum number of lines in history");

        if self.entries.len() > maximum {
            debug!(
                lines = self.entries.len(),
                maximum, "History holds more lines than the new maximum"
            );
            self.trim_to_count(maximum).await
        } else {
            Ok(0)
        }
    }

    /// Replaces the in-memory history with the content of `path`.
    ///
    /// Another instance may have written to the file while this one was in the
    /// background; its content wins. On failure the current entries are kept and
    /// the buffer becomes [`BufferState::Degraded`] until a refresh succeeds.
    pub async fn refresh_from_file(&mut self, path: impl AsRef<Path>) -> HistoryResult<usize> {
        if self.store.is_none() {
            return Err(HistoryError::NotInitialized);
        }
        let path = path.as_ref();

        match load_lines(path).await {
            Ok(lines) => {
                self.replace_entries(&lines);
                self.state = BufferState::Ready;
                debug!(lines = self.entries.len(), "Refreshed history from file");
                Ok(self.entries.len())
            }
            Err(e) => {
                error!(
                    path = %path.display(),
                    "The history file may be out of sync, refreshing it from disk failed"
                );
                self.state = BufferState::Degraded;
                Err(e)
            }
        }
    }

    /// Refreshes from the file this buffer was initialized with.
    pub async fn refresh(&mut self) -> HistoryResult<usize> {
        let path = self
            .store
            .as_ref()
            .map(|store| store.path().to_path_buf())
            .ok_or(HistoryError::NotInitialized)?;
        self.refresh_from_file(path).await
    }

    /// The history in on-disk line format, oldest first.
    #[must_use]
    pub fn export_all(&self) -> Vec<String> {
        self.entries.iter().map(HistoryEntry::to_line).collect()
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(HistoryEntry::command)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn state(&self) -> BufferState {
        self.state
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.store.as_ref().map(HistoryStore::path)
    }

    #[must_use]
    pub const fn maximum_lines(&self) -> usize {
        self.maximum_lines
    }

    #[must_use]
    pub const fn limits(&self) -> LineLimits {
        self.limits
    }

    /// Number of lines the history file is known to hold after the last
    /// successful load or write.
    #[must_use]
    pub const fn persisted_len(&self) -> usize {
        self.persisted_lines
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn usage_percentage(&self) -> f64 {
        self.persisted_lines as f64 / self.maximum_lines as f64 * 100.0
    }

    #[must_use]
    pub fn frequency_map(&self) -> FrequencyMap {
        FrequencyMap::from_entries(&self.entries)
    }

    pub fn reset_cursor(&mut self) {
        self.cursor.reset(self.entries.len());
    }

    #[must_use]
    pub const fn cursor(&self) -> &ScrollCursor {
        &self.cursor
    }

    pub fn step_backward(&mut self, prefix: &str) -> Option<String> {
        self.cursor.step_backward(&self.entries, prefix)
    }

    pub fn step_forward(&mut self, prefix: &str) -> Option<String> {
        self.cursor.step_forward(&self.entries, prefix)
    }

    pub fn peek_backward_once(&mut self) -> Option<String> {
        self.cursor.peek_backward_once(&self.entries)
    }

    pub fn peek_forward_once(&mut self) -> Option<String> {
        self.cursor.peek_forward_once(&self.entries)
    }

    /// Up-arrow handler: `current_input` is the search prefix in reverse-search
    /// mode and is ignored otherwise.
    pub fn scroll_back(&mut self, current_input: &str, mode: RecallMode) -> Option<String> {
        match mode {
            RecallMode::Plain => self.peek_backward_once(),
            RecallMode::ReverseSearch => self.step_backward(current_input),
        }
    }

    pub fn scroll_forward(&mut self, current_input: &str, mode: RecallMode) -> Option<String> {
        match mode {
            RecallMode::Plain => self.peek_forward_once(),
            RecallMode::ReverseSearch => self.step_forward(current_input),
        }
    }

    pub fn reset_scroll(&mut self) {
        self.reset_cursor();
    }

    fn replace_entries(&mut self, lines: &[String]) {
        self.entries = lines.iter().filter_map(|line| HistoryEntry::parse(line)).collect();
        self.persisted_lines = self.entries.len();
        self.cursor.reset(self.entries.len());
    }

    fn evict_to(&mut self, count: usize) -> usize {
        let excess = self.entries.len().saturating_sub(count);
        if excess > 0 {
            self.entries.drain(..excess);
            debug!(
                removed = excess,
                kept = self.entries.len(),
                "Removed oldest lines from history"
            );
        }
        excess
    }

    fn writable_store(&self) -> HistoryResult<&HistoryStore> {
        match (&self.store, self.state) {
            (Some(store), BufferState::Ready) => Ok(store),
            (Some(store), _) => Err(HistoryError::Degraded {
                path: store.path().to_path_buf(),
            }),
            (None, _) => Err(HistoryError::NotInitialized),
        }
    }

    async fn persist(&mut self) -> HistoryResult<()> {
        let lines = self.export_all();
        self.writable_store()?.atomic_replace(&lines).await?;
        self.persisted_lines = lines.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::store::BACKUP_FILE_NAME;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    async fn ready_buffer(dir: &TempDir, maximum: usize) -> HistoryBuffer {
        let mut buffer =
            HistoryBuffer::new(LineLimits::new(1, 1_000_000), maximum).expect("valid maximum");
        buffer
            .initialize(dir.path().join(".history"))
            .await
            .expect("Failed to initialize");
        buffer
    }

    fn history_path(dir: &TempDir) -> PathBuf {
        dir.path().join(".history")
    }

    fn commands(buffer: &HistoryBuffer) -> Vec<&str> {
        buffer.commands().collect()
    }

    #[test]
    fn rejects_maximum_outside_limits() {
        let result = HistoryBuffer::new(LineLimits::default(), 5);
        assert!(matches!(result, Err(HistoryError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn operations_before_initialize_fail() {
        let mut buffer = HistoryBuffer::new(LineLimits::default(), 100).expect("valid maximum");

        assert!(matches!(
            buffer.push_line("ls").await,
            Err(HistoryError::NotInitialized)
        ));
        assert!(matches!(
            buffer.trim_to_count(0).await,
            Err(HistoryError::NotInitialized)
        ));
        assert!(matches!(
            buffer.refresh().await,
            Err(HistoryError::NotInitialized)
        ));
        assert_eq!(buffer.state(), BufferState::Uninitialized);
    }

    #[tokio::test]
    async fn loads_entries_in_order_and_skips_placeholder() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(
            history_path(&dir),
            "\0\n2023-06-01T12:00:00.000Z: first\n\n2023-06-01T12:00:01.000Z: second\n",
        )
        .expect("Failed to write");

        let buffer = ready_buffer(&dir, 100).await;

        assert_eq!(buffer.state(), BufferState::Ready);
        assert_eq!(commands(&buffer), vec!["first", "second"]);
        assert_eq!(buffer.persisted_len(), 2);
    }

    #[tokio::test]
    async fn second_initialize_keeps_session_lines() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = ready_buffer(&dir, 100).await;
        assert_ok!(buffer.push_line("ls").await);
        std::fs::write(history_path(&dir), "").expect("Failed to write");

        let state = buffer
            .initialize(history_path(&dir))
            .await
            .expect("Failed to initialize");

        assert_eq!(state, BufferState::Ready);
        assert_eq!(commands(&buffer), vec!["ls"]);
    }

    #[tokio::test]
    async fn suppresses_only_sequential_duplicates() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = ready_buffer(&dir, 100).await;

        assert_eq!(
            buffer.push_line("ls").await.expect("push"),
            PushOutcome::Appended { evicted: 0 }
        );
        assert_eq!(
            buffer.push_line(" ls ").await.expect("push"),
            PushOutcome::Ignored
        );
        buffer.push_line("pwd").await.expect("push");
        buffer.push_line("ls").await.expect("push");

        assert_eq!(commands(&buffer), vec!["ls", "pwd", "ls"]);
    }

    #[tokio::test]
    async fn ignores_blank_lines() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = ready_buffer(&dir, 100).await;

        assert_eq!(buffer.push_line("").await.expect("push"), PushOutcome::Ignored);
        assert_eq!(
            buffer.push_line(" \t ").await.expect("push"),
            PushOutcome::Ignored
        );
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn push_trims_oldest_and_trim_to_count_keeps_newest() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = ready_buffer(&dir, 3).await;

        for line in ["a", "b", "c"] {
            buffer.push_line(line).await.expect("push");
        }
        assert_eq!(
            buffer.push_line("d").await.expect("push"),
            PushOutcome::Appended { evicted: 1 }
        );
        assert_eq!(commands(&buffer), vec!["b", "c", "d"]);

        assert_eq!(buffer.trim_to_count(1).await.expect("trim"), 2);
        assert_eq!(commands(&buffer), vec!["d"]);

        let on_disk = std::fs::read_to_string(history_path(&dir)).expect("Failed to read");
        assert_eq!(on_disk.lines().count(), 1);
        assert!(on_disk.ends_with(": d"));
    }

    #[tokio::test]
    async fn length_never_exceeds_maximum() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = ready_buffer(&dir, 5).await;

        for i in 0..20 {
            buffer.push_line(&format!("cmd {i}")).await.expect("push");
            assert!(buffer.len() <= buffer.maximum_lines());
        }
        assert_eq!(buffer.commands().next(), Some("cmd 15"));
    }

    #[tokio::test]
    async fn trim_rejects_count_above_maximum_without_mutating() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = ready_buffer(&dir, 3).await;
        buffer.push_line("a").await.expect("push");

        let result = buffer.trim_to_count(4).await;

        assert!(matches!(result, Err(HistoryError::InvalidArgument(_))));
        assert_eq!(buffer.len(), 1);
    }

    #[tokio::test]
    async fn lowering_maximum_trims_history() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = HistoryBuffer::new(LineLimits::new(2, 10), 10).expect("valid maximum");
        buffer
            .initialize(history_path(&dir))
            .await
            .expect("Failed to initialize");
        for line in ["a", "b", "c", "d"] {
            buffer.push_line(line).await.expect("push");
        }

        assert!(matches!(
            buffer.set_maximum_lines(1).await,
            Err(HistoryError::InvalidArgument(_))
        ));
        assert_eq!(buffer.maximum_lines(), 10);

        assert_eq!(buffer.set_maximum_lines(2).await.expect("set max"), 2);
        assert_eq!(commands(&buffer), vec!["c", "d"]);
        assert_eq!(buffer.set_maximum_lines(5).await.expect("set max"), 0);
    }

    #[tokio::test]
    async fn oversized_file_is_trimmed_on_initialize() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let content: Vec<String> = (0..8).map(|i| format!("line {i}")).collect();
        std::fs::write(history_path(&dir), content.join("\n")).expect("Failed to write");

        let buffer = ready_buffer(&dir, 5).await;

        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.commands().next(), Some("line 3"));
        let on_disk = std::fs::read_to_string(history_path(&dir)).expect("Failed to read");
        assert_eq!(on_disk.lines().count(), 5);
    }

    #[tokio::test]
    async fn failed_write_keeps_line_in_memory() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = ready_buffer(&dir, 100).await;
        buffer.push_line("saved").await.expect("push");
        let backup = dir.path().join(BACKUP_FILE_NAME);
        std::fs::create_dir(&backup).expect("Failed to create dir");
        std::fs::write(backup.join("block"), "").expect("Failed to write");

        let result = buffer.push_line("unsaved").await;

        assert!(matches!(result, Err(HistoryError::Write { .. })));
        assert_eq!(commands(&buffer), vec!["saved", "unsaved"]);
        assert_eq!(buffer.persisted_len(), 1);
        assert_eq!(buffer.step_backward(""), Some("unsaved".to_string()));
    }

    #[tokio::test]
    async fn failed_initial_load_can_be_retried() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(history_path(&dir), [0xff, 0xfe]).expect("Failed to write");
        let mut buffer = HistoryBuffer::new(LineLimits::default(), 100).expect("valid maximum");

        assert_err!(buffer.initialize(history_path(&dir)).await);
        assert_eq!(buffer.state(), BufferState::Degraded);
        assert!(matches!(
            buffer.push_line("ls").await,
            Err(HistoryError::NotInitialized)
        ));

        std::fs::write(history_path(&dir), "2023-06-01T12:00:00.000Z: ls").expect("Failed to write");
        let state = buffer
            .initialize(history_path(&dir))
            .await
            .expect("Failed to initialize");
        assert_eq!(state, BufferState::Ready);
        assert_eq!(commands(&buffer), vec!["ls"]);
    }

    #[tokio::test]
    async fn failed_refresh_degrades_until_next_success() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = ready_buffer(&dir, 100).await;
        buffer.push_line("kept").await.expect("push");
        let unreadable = dir.path().join("unreadable");
        std::fs::write(&unreadable, [0xff, 0xfe]).expect("Failed to write");

        assert!(matches!(
            buffer.refresh_from_file(&unreadable).await,
            Err(HistoryError::Read { .. })
        ));
        assert_eq!(buffer.state(), BufferState::Degraded);
        assert_eq!(commands(&buffer), vec!["kept"]);
        assert!(matches!(
            buffer.trim_to_count(0).await,
            Err(HistoryError::Degraded { .. })
        ));
        assert_eq!(buffer.len(), 1);
        assert!(matches!(
            buffer.push_line("typed while degraded").await,
            Err(HistoryError::Degraded { .. })
        ));
        assert_eq!(buffer.len(), 2);

        assert_eq!(buffer.refresh().await.expect("refresh"), 1);
        assert_eq!(buffer.state(), BufferState::Ready);
        assert_eq!(commands(&buffer), vec!["kept"]);
    }

    #[tokio::test]
    async fn scroll_back_uses_mode_chosen_by_caller() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = ready_buffer(&dir, 100).await;
        for line in ["get status", "get version", "set mode"] {
            buffer.push_line(line).await.expect("push");
        }

        assert_eq!(
            buffer.scroll_back("get", RecallMode::Plain),
            Some("set mode".to_string())
        );
        buffer.reset_scroll();
        assert_eq!(
            buffer.scroll_back("get", RecallMode::ReverseSearch),
            Some("get version".to_string())
        );
        assert_eq!(
            buffer.scroll_forward("get", RecallMode::ReverseSearch),
            None
        );
        assert_eq!(buffer.cursor().position(), buffer.len());
    }

    #[tokio::test]
    async fn usage_percentage_tracks_fill_level() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = ready_buffer(&dir, 4).await;
        buffer.push_line("a").await.expect("push");

        assert!((buffer.usage_percentage() - 25.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn degraded_buffer_rejects_lower_maximum_without_change() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = ready_buffer(&dir, 10).await;
        for line in ["a", "b", "c", "d", "e"] {
            buffer.push_line(line).await.expect("push");
        }
        let unreadable = dir.path().join("unreadable");
        std::fs::write(&unreadable, [0xff, 0xfe]).expect("Failed to write");
        assert_err!(buffer.refresh_from_file(&unreadable).await);

        let result = buffer.set_maximum_lines(2).await;

        assert!(matches!(result, Err(HistoryError::Degraded { .. })));
        assert_eq!(buffer.maximum_lines(), 10);
        assert_eq!(buffer.len(), 5);
        assert!(buffer.len() <= buffer.maximum_lines());
    }

    #[tokio::test]
    async fn oversized_file_initializes_when_write_back_fails() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let content: Vec<String> = (0..8).map(|i| format!("line {i}")).collect();
        std::fs::write(history_path(&dir), content.join("\n")).expect("Failed to write");
        let backup = dir.path().join(BACKUP_FILE_NAME);
        std::fs::create_dir(&backup).expect("Failed to create dir");
        std::fs::write(backup.join("block"), "").expect("Failed to write");
        let mut buffer =
            HistoryBuffer::new(LineLimits::new(1, 1_000_000), 5).expect("valid maximum");

        let state = buffer
            .initialize(history_path(&dir))
            .await
            .expect("Failed to initialize");

        assert_eq!(state, BufferState::Ready);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.persisted_len(), 8);
        assert_eq!(buffer.step_backward(""), Some("line 7".to_string()));
    }

    #[tokio::test]
    async fn usage_percentage_counts_persisted_lines() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = ready_buffer(&dir, 4).await;
        buffer.push_line("a").await.expect("push");
        let backup = dir.path().join(BACKUP_FILE_NAME);
        std::fs::create_dir(&backup).expect("Failed to create dir");
        std::fs::write(backup.join("block"), "").expect("Failed to write");

        assert_err!(buffer.push_line("b").await);

        assert_eq!(buffer.len(), 2);
        assert!((buffer.usage_percentage() - 25.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn percentage_to_keep_rounds_up() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut buffer = ready_buffer(&dir, 10).await;
        for line in ["a", "b", "c"] {
            buffer.push_line(line).await.expect("push");
        }

        assert_eq!(buffer.lines_for_percentage(50).expect("valid"), 2);
        assert_eq!(buffer.lines_for_percentage(0).expect("valid"), 0);
        assert_eq!(buffer.lines_for_percentage(100).expect("valid"), 3);
        assert!(matches!(
            buffer.lines_for_percentage(101),
            Err(HistoryError::InvalidArgument(_))
        ));
    }
}
