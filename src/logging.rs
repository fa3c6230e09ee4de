//! File-backed logging. The terminal is owned by the UI, so nothing is
//! written to stderr while the reader runs.

use std::fs::OpenOptions;
use std::str::FromStr;

use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::config::LogConfig;
use crate::error::{AppError, AppResult};

/// Installs the global logger when a log path is configured. `RUST_LOG`
/// overrides the configured level.
pub fn init(config: &LogConfig) -> AppResult<()> {
    let Some(path) = &config.path else {
        return Ok(());
    };
    let level = parse_level(&config.level)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| {
            AppError::io_with_context(source, format!("failed to open log file: {}", path.display()))
        })?;

    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|err| AppError::logging(err.to_string()))
}

fn parse_level(raw: &str) -> AppResult<LevelFilter> {
    LevelFilter::from_str(raw.trim())
        .map_err(|_| AppError::logging(format!("unknown log level: {raw}")))
}
