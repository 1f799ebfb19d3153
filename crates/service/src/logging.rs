// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup

use crate::config::Config;
use crate::error::ServiceError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter from the configured directives, falling back to `info`
pub fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(Config::DEFAULT_LOG_FILTER))
}

/// Install a global subscriber writing to the configured log file.
///
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn setup_logging(config: &Config) -> Result<WorkerGuard, ServiceError> {
    use tracing_subscriber::{fmt, prelude::*};

    let log_path = config.log_path();
    let (dir, file_name) = match (log_path.parent(), log_path.file_name()) {
        (Some(dir), Some(name)) => (dir, name),
        _ => {
            return Err(ServiceError::Logging(format!(
                "invalid log path {}",
                log_path.display()
            )))
        }
    };
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()
        .map_err(|e| ServiceError::Logging(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
