// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service errors

use crate::config::ConfigError;
use cst_adapters::DirectoryError;
use cst_core::{EngineError, ItemId, UserId};
use cst_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{actor} may not modify pipeline item {item}")]
    Forbidden { actor: UserId, item: ItemId },

    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Engine error, if the request was rejected by the stage rules
    pub fn engine(&self) -> Option<&EngineError> {
        match self {
            ServiceError::Engine(e) => Some(e),
            _ => None,
        }
    }

    /// Store error, if persistence rejected the request
    pub fn store(&self) -> Option<&StoreError> {
        match self {
            ServiceError::Store(e) => Some(e),
            _ => None,
        }
    }
}
