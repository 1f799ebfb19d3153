// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory backed by a TOML file of display names
//!
//! ```toml
//! [users]
//! user-1 = "Dana Whitfield"
//!
//! [organizations]
//! org-1 = "Acme Robotics"
//!
//! [contacts]
//! contact-1 = "Lee Park"
//! ```

use super::{DirectoryAdapter, DirectoryError};
use async_trait::async_trait;
use cst_core::{ContactId, OrganizationId, UserId};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Names {
    #[serde(default)]
    users: HashMap<String, String>,
    #[serde(default)]
    organizations: HashMap<String, String>,
    #[serde(default)]
    contacts: HashMap<String, String>,
}

/// Directory loaded once from a TOML file
#[derive(Clone, Debug, Default)]
pub struct FileDirectory {
    names: Arc<Names>,
}

impl FileDirectory {
    pub async fn load(path: &Path) -> Result<Self, DirectoryError> {
        let contents = tokio::fs::read_to_string(path).await?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, DirectoryError> {
        let names: Names = toml::from_str(contents)?;
        Ok(Self {
            names: Arc::new(names),
        })
    }

    pub fn len(&self) -> usize {
        self.names.users.len() + self.names.organizations.len() + self.names.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DirectoryAdapter for FileDirectory {
    async fn user_name(&self, id: &UserId) -> Result<Option<String>, DirectoryError> {
        Ok(self.names.users.get(id.as_str()).cloned())
    }

    async fn organization_name(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<String>, DirectoryError> {
        Ok(self.names.organizations.get(id.as_str()).cloned())
    }

    async fn contact_name(&self, id: &ContactId) -> Result<Option<String>, DirectoryError> {
        Ok(self.names.contacts.get(id.as_str()).cloned())
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
