// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake directory for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DirectoryAdapter, DirectoryError};
use async_trait::async_trait;
use cst_core::{ContactId, OrganizationId, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded directory call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCall {
    UserName(UserId),
    OrganizationName(OrganizationId),
    ContactName(ContactId),
}

#[derive(Default)]
struct FakeState {
    users: HashMap<UserId, String>,
    organizations: HashMap<OrganizationId, String>,
    contacts: HashMap<ContactId, String>,
    unavailable: bool,
}

/// Fake directory for testing
#[derive(Clone, Default)]
pub struct FakeDirectory {
    state: Arc<Mutex<FakeState>>,
    calls: Arc<Mutex<Vec<DirectoryCall>>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, id: impl Into<UserId>, name: impl Into<String>) -> Self {
        self.lock().users.insert(id.into(), name.into());
        self
    }

    pub fn with_organization(self, id: impl Into<OrganizationId>, name: impl Into<String>) -> Self {
        self.lock().organizations.insert(id.into(), name.into());
        self
    }

    pub fn with_contact(self, id: impl Into<ContactId>, name: impl Into<String>) -> Self {
        self.lock().contacts.insert(id.into(), name.into());
        self
    }

    /// Make every lookup fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<DirectoryCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: DirectoryCall) -> Result<(), DirectoryError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        if self.lock().unavailable {
            return Err(DirectoryError::Unavailable("fake directory offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryAdapter for FakeDirectory {
    async fn user_name(&self, id: &UserId) -> Result<Option<String>, DirectoryError> {
        self.record(DirectoryCall::UserName(id.clone()))?;
        Ok(self.lock().users.get(id).cloned())
    }

    async fn organization_name(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<String>, DirectoryError> {
        self.record(DirectoryCall::OrganizationName(id.clone()))?;
        Ok(self.lock().organizations.get(id).cloned())
    }

    async fn contact_name(&self, id: &ContactId) -> Result<Option<String>, DirectoryError> {
        self.record(DirectoryCall::ContactName(id.clone()))?;
        Ok(self.lock().contacts.get(id).cloned())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
