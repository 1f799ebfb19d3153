// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op directory for when names are not needed.

use super::{DirectoryAdapter, DirectoryError};
use async_trait::async_trait;
use cst_core::{ContactId, OrganizationId, UserId};

/// Directory that resolves nothing.
///
/// Views built with it carry ids only.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpDirectory;

impl NoOpDirectory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DirectoryAdapter for NoOpDirectory {
    async fn user_name(&self, _id: &UserId) -> Result<Option<String>, DirectoryError> {
        Ok(None)
    }

    async fn organization_name(
        &self,
        _id: &OrganizationId,
    ) -> Result<Option<String>, DirectoryError> {
        Ok(None)
    }

    async fn contact_name(&self, _id: &ContactId) -> Result<Option<String>, DirectoryError> {
        Ok(None)
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
