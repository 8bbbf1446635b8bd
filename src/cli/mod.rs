mod args;
mod commands;

pub use args::{Cli, Commands, ConfigSubcommands};
pub use commands::run;

use serial_history::config::ConfigError;
use serial_history::history::HistoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine where to store the history file, pass --history-file")]
    NoHistoryPath,

    #[error("Could not determine the config file location, pass --config")]
    NoConfigPath,
}

pub type CliResult<T> = std::result::Result<T, CliError>;
