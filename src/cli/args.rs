//! CLI argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "serial-history")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// History file to use instead of the configured one
    #[arg(long, global = true)]
    pub history_file: Option<PathBuf>,

    /// Maximum number of lines kept in the history file
    #[arg(long, global = true)]
    pub max_lines: Option<usize>,

    /// Config file to read instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a submitted command line
    Commit {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        line: Vec<String>,
    },
    /// Print the history, oldest first
    List {
        /// Print lines as stored, with timestamps
        #[arg(long)]
        raw: bool,
    },
    /// Keep only the newest lines
    Trim {
        /// Number of lines to keep
        #[arg(required_unless_present = "percent", conflicts_with = "percent")]
        keep: Option<usize>,
        /// Percentage of the current lines to keep, rounded up
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: Option<u8>,
    },
    /// Change the maximum number of lines and save it to the config file
    SetMax { lines: usize },
    /// Save a new history file location to the config file
    SetPath { path: PathBuf },
    /// Print commands starting with PREFIX, newest first
    Search {
        #[arg(default_value = "")]
        prefix: String,
    },
    /// Show fill level and most used commands
    Stats {
        #[arg(long, default_value = "5")]
        top: usize,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigSubcommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommands {
    /// Initialize a new config file
    Init,
    /// Print config file location
    Where,
}
