// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Display-name lookups for users, organizations and contacts

mod file;
mod noop;

pub use file::FileDirectory;
pub use noop::NoOpDirectory;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DirectoryCall, FakeDirectory};

use async_trait::async_trait;
use cst_core::{ContactId, OrganizationId, UserId};
use thiserror::Error;

/// Errors from directory lookups
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid directory file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Resolves references held by pipeline items to display names.
///
/// An unknown id is `Ok(None)`, not an error.
#[async_trait]
pub trait DirectoryAdapter: Clone + Send + Sync + 'static {
    async fn user_name(&self, id: &UserId) -> Result<Option<String>, DirectoryError>;

    async fn organization_name(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<String>, DirectoryError>;

    async fn contact_name(&self, id: &ContactId) -> Result<Option<String>, DirectoryError>;
}
