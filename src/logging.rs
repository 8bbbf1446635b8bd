use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Keeps the file writer alive; logs written after this is dropped are lost.
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// With a `log_file`, records go there as JSON through a non-blocking writer;
/// otherwise they go to stderr. `RUST_LOG` overrides the default level.
pub fn init(log_file: Option<&Path>, verbose: bool) -> LogGuard {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let Some(log_path) = log_file else {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false),
        );
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            eprintln!("Failed to set tracing subscriber");
        }
        return LogGuard { _guard: None };
    };

    let file = match fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file: {e}");
            return LogGuard { _guard: None };
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
        return LogGuard { _guard: None };
    }

    tracing::info!(path = %log_path.display(), "File logging initialized");

    LogGuard {
        _guard: Some(guard),
    }
}
