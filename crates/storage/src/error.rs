// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage errors

use crate::wal::WalError;
use cst_core::{ItemId, OrganizationId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("pipeline item not found: {0}")]
    NotFound(ItemId),

    #[error("pipeline item already exists: {0}")]
    AlreadyExists(ItemId),

    #[error(
        "pipeline item {id} was modified by another request \
         (expected version {expected}, found {actual})"
    )]
    ConcurrencyConflict {
        id: ItemId,
        expected: u64,
        actual: u64,
    },

    #[error("organization {organization_id} already has an open pipeline item ({existing})")]
    DuplicateOpenItem {
        organization_id: OrganizationId,
        existing: ItemId,
    },

    #[error("history of {id} expects sequence {expected}, got {actual}")]
    HistoryGap { id: ItemId, expected: u64, actual: u64 },

    #[error("WAL error: {0}")]
    Wal(#[from] WalError),
}

impl StoreError {
    /// Whether reloading and re-applying the change may succeed
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::ConcurrencyConflict { .. })
    }
}
