//! Backing store for the history file: whole-file load and crash-tolerant replace.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info};

use super::error::{HistoryError, HistoryResult, WriteStage};

/// Sibling file the current history is moved to while a replacement is written.
pub const BACKUP_FILE_NAME: &str = "temporary_history_file";

/// Initial content of a freshly created history file.
const PLACEHOLDER: &str = "\0";

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    backup_path: PathBuf,
}

impl HistoryStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let backup_path = path.parent().map_or_else(
            || PathBuf::from(BACKUP_FILE_NAME),
            |dir| dir.join(BACKUP_FILE_NAME),
        );
        Self { path, backup_path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    pub async fn load(&self) -> HistoryResult<Vec<String>> {
        load_lines(&self.path).await
    }

    /// Replaces the file content with `lines` joined by newlines.
    ///
    /// The current file is renamed to [`BACKUP_FILE_NAME`] first, so either the old
    /// or the new content is on disk at every point. A failed write puts the backup
    /// back in place.
    pub async fn atomic_replace(&self, lines: &[String]) -> HistoryResult<()> {
        let content = lines.join("\n");
        self.replace_with(move |path| async move { fs::write(path, content).await })
            .await
    }

    pub(crate) async fn replace_with<F, Fut>(&self, write: F) -> HistoryResult<()>
    where
        F: FnOnce(PathBuf) -> Fut,
        Fut: Future<Output = io::Result<()>>,
    {
        let has_original = fs::try_exists(&self.path)
            .await
            .map_err(|source| self.write_error(WriteStage::Backup, source))?;

        if has_original && let Err(source) = fs::rename(&self.path, &self.backup_path).await {
            error!(
                path = %self.path.display(),
                "Could not move history file aside, verify that it is not locked by another application"
            );
            return Err(self.write_error(WriteStage::Backup, source));
        }

        if let Err(source) = write(self.path.clone()).await {
            error!(
                path = %self.path.display(),
                "Could not write the in-memory history to the history file"
            );
            if has_original {
                self.restore_backup().await;
            }
            return Err(self.write_error(WriteStage::Write, source));
        }

        if has_original {
            fs::remove_file(&self.backup_path)
                .await
                .map_err(|source| self.write_error(WriteStage::Cleanup, source))?;
        }

        debug!(path = %self.path.display(), "History file replaced");
        Ok(())
    }

    async fn restore_backup(&self) {
        match fs::rename(&self.backup_path, &self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "Restored history file from backup"),
            Err(e) => error!(
                backup = %self.backup_path.display(),
                "Could not restore history file from backup: {e}"
            ),
        }
    }

    fn write_error(&self, stage: WriteStage, source: io::Error) -> HistoryError {
        HistoryError::Write {
            path: self.path.clone(),
            stage,
            source,
        }
    }
}

/// Reads every line of `path`, creating the file if it does not exist yet.
///
/// Only the empty element produced by a trailing newline is dropped; blank lines
/// are left for the caller to filter.
pub async fn load_lines(path: &Path) -> HistoryResult<Vec<String>> {
    let read_error = |source| HistoryError::Read {
        path: path.to_path_buf(),
        source,
    };

    if !fs::try_exists(path).await.map_err(read_error)? {
        create_placeholder(path).await.map_err(read_error)?;
        info!(path = %path.display(), "Created history file");
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).await.map_err(|source| {
        error!(
            path = %path.display(),
            "Could not read the content of the history file, make sure it is not locked by an application"
        );
        read_error(source)
    })?;

    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    Ok(lines)
}

async fn create_placeholder(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, PLACEHOLDER).await
}
