// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service configuration
//!
//! Loaded from an optional TOML file, then overridden from the environment:
//!
//! - `CST_STATE_DIR`: state directory (WAL and log live here)
//! - `XDG_STATE_HOME`: base for the default state directory
//! - `CST_LOG`: tracing filter directives

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const STATE_DIR_ENV: &str = "CST_STATE_DIR";
const LOG_ENV: &str = "CST_LOG";
const MAX_PAGE_SIZE: u32 = cst_core::query::MAX_PAGE_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not determine state directory (set CST_STATE_DIR or HOME)")]
    NoStateDir,

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Contents of the config file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub state_dir: Option<PathBuf>,
    pub log_filter: Option<String>,
    pub conflict_retries: Option<u32>,
    #[serde(with = "humantime_serde")]
    pub retry_backoff: Option<Duration>,
    pub default_page_size: Option<u32>,
    pub directory_path: Option<PathBuf>,
}

impl ConfigFile {
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }
}

/// Resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub state_dir: PathBuf,
    /// `EnvFilter` directives
    pub log_filter: String,
    /// Times a save is retried after a concurrency conflict
    pub conflict_retries: u32,
    #[serde(with = "humantime_serde")]
    pub retry_backoff: Duration,
    pub default_page_size: u32,
    /// TOML file of display names; none resolves no names
    pub directory_path: Option<PathBuf>,
}

impl Config {
    pub const DEFAULT_LOG_FILTER: &'static str = "info";
    pub const DEFAULT_CONFLICT_RETRIES: u32 = 3;
    pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(25);

    /// Configuration rooted at an explicit state directory
    pub fn for_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            log_filter: Self::DEFAULT_LOG_FILTER.to_string(),
            conflict_retries: Self::DEFAULT_CONFLICT_RETRIES,
            retry_backoff: Self::DEFAULT_RETRY_BACKOFF,
            default_page_size: cst_core::query::DEFAULT_PAGE_SIZE,
            directory_path: None,
        }
    }

    /// Load from an optional file plus the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => ConfigFile::read(path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge file settings with environment lookups
    pub fn resolve(
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let state_dir = match env(STATE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => match file.state_dir {
                Some(dir) => dir,
                None => default_state_dir(&env)?,
            },
        };

        let log_filter = env(LOG_ENV)
            .filter(|f| !f.is_empty())
            .or(file.log_filter)
            .unwrap_or_else(|| Self::DEFAULT_LOG_FILTER.to_string());

        let config = Self {
            state_dir,
            log_filter,
            conflict_retries: file
                .conflict_retries
                .unwrap_or(Self::DEFAULT_CONFLICT_RETRIES),
            retry_backoff: file.retry_backoff.unwrap_or(Self::DEFAULT_RETRY_BACKOFF),
            default_page_size: file
                .default_page_size
                .unwrap_or(cst_core::query::DEFAULT_PAGE_SIZE),
            directory_path: file.directory_path,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.default_page_size) {
            return Err(ConfigError::Invalid {
                field: "default_page_size",
                reason: format!("must be between 1 and {MAX_PAGE_SIZE}"),
            });
        }
        if self.state_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "state_dir",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn wal_path(&self) -> PathBuf {
        self.state_dir.join("wal").join("pipeline.wal")
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join("cst.log")
    }
}

/// `$XDG_STATE_HOME/cst`, else `~/.local/state/cst`
fn default_state_dir(env: &impl Fn(&str) -> Option<String>) -> Result<PathBuf, ConfigError> {
    if let Some(xdg) = env("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join("cst"));
    }
    let home = env("HOME")
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/cst"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
