use std::path::{Path, PathBuf};

use serial_history::config::{AppConfig, ConfigPatch, ConfigPersister};
use serial_history::history::HistoryBuffer;
use serial_history::logging;

use super::{Cli, CliError, CliResult, Commands, ConfigSubcommands};

pub async fn run(cli: Cli) -> CliResult<()> {
    let config_path = cli.config.clone().or_else(AppConfig::get_config_path);
    let config = AppConfig::load_from(config_path.as_deref());
    let _log_guard = logging::init(config.log_file.as_deref(), cli.verbose);

    match &cli.command {
        Commands::Config { command } => return run_config(command, config_path),
        Commands::SetPath { path } => return set_history_path(path, config_path),
        _ => {}
    }

    let history_path = cli
        .history_file
        .clone()
        .or_else(|| config.history_path())
        .ok_or(CliError::NoHistoryPath)?;
    let maximum = cli.max_lines.unwrap_or(config.max_lines);

    let mut buffer = HistoryBuffer::new(config.line_limits(), maximum)?;
    buffer.initialize(&history_path).await?;

    match cli.command {
        Commands::Commit { line } => {
            buffer.push_line(&line.join(" ")).await?;
        }
        Commands::List { raw } => {
            for entry in buffer.entries() {
                if raw {
                    println!("{entry}");
                } else {
                    println!("{}", entry.command());
                }
            }
        }
        Commands::Trim { keep, percent } => {
            let keep = match (keep, percent) {
                (Some(keep), _) => keep,
                (None, Some(percent)) => buffer.lines_for_percentage(percent)?,
                (None, None) => buffer.len(),
            };
            let removed = buffer.trim_to_count(keep).await?;
            println!("Removed {removed} lines, {} remain", buffer.len());
        }
        Commands::SetMax { lines } => {
            let removed = buffer.set_maximum_lines(lines).await?;
            if let Some(path) = config_path {
                ConfigPersister::new(path).apply_patch(&ConfigPatch::max_lines(lines))?;
            }
            println!("Maximum set to {lines} lines, removed {removed}");
        }
        Commands::Search { prefix } => {
            while let Some(hit) = buffer.step_backward(&prefix) {
                println!("{hit}");
            }
        }
        Commands::Stats { top } => {
            println!(
                "{} / {} lines ({:.1}%)",
                buffer.len(),
                buffer.maximum_lines(),
                buffer.usage_percentage()
            );
            for (command, count) in buffer.frequency_map().most_frequent(top) {
                println!("{count:>6}  {command}");
            }
        }
        Commands::Config { .. } | Commands::SetPath { .. } => unreachable!(),
    }

    Ok(())
}

fn set_history_path(path: &Path, config_path: Option<PathBuf>) -> CliResult<()> {
    let config_path = config_path.ok_or(CliError::NoConfigPath)?;
    let path = std::path::absolute(path)?;
    ConfigPersister::new(config_path).apply_patch(&ConfigPatch::history_file(&path))?;
    println!("✓ History file set to {}", path.display());
    Ok(())
}

fn run_config(command: &ConfigSubcommands, config_path: Option<PathBuf>) -> CliResult<()> {
    match command {
        ConfigSubcommands::Init => {
            let path = AppConfig::init_default()?;
            println!("✓ Created config file at {}", path.display());
        }
        ConfigSubcommands::Where => match config_path {
            Some(path) => println!("{}", path.display()),
            None => eprintln!("✗ Could not determine config path"),
        },
    }
    Ok(())
}
