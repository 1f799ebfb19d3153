// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Access policy for pipeline mutations

use crate::id::UserId;
use crate::item::PipelineItem;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Manager,
    Analyst,
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Manager => "MANAGER",
            UserRole::Analyst => "ANALYST",
            UserRole::Viewer => "VIEWER",
        }
    }

    /// Roles allowed to modify items they do not own
    pub fn manages_pipeline(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user on whose behalf a request runs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: impl Into<UserId>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Owners, admins and managers may modify an item
    pub fn can_modify(&self, item: &PipelineItem) -> bool {
        self.role.manages_pipeline() || item.owner_id() == &self.id
    }
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;
