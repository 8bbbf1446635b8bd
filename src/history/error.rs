use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Step of an atomic replace that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    Backup,
    Write,
    Cleanup,
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Backup => "moving the file aside",
            Self::Write => "writing the new content",
            Self::Cleanup => "removing the backup",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error(
        "Could not read history file {}: {source}. Make sure the file is not locked by another application",
        path.display()
    )]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "Could not sync history to {} while {stage}: {source}. Check the file isn't locked",
        path.display()
    )]
    Write {
        path: PathBuf,
        stage: WriteStage,
        #[source]
        source: io::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("History buffer is not initialized")]
    NotInitialized,

    #[error(
        "History buffer is out of sync with {}; refresh it from the file before changing it",
        path.display()
    )]
    Degraded { path: PathBuf },
}

impl HistoryError {
    /// True for failures of the backing file, as opposed to caller mistakes.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Write { .. })
    }
}

pub type HistoryResult<T> = std::result::Result<T, HistoryError>;
