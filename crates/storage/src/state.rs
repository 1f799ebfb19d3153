// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

use crate::error::StoreError;
use cst_core::{ItemId, Operation, PipelineItem, PipelineRecord};
use std::collections::HashMap;

/// A stored record and the number of operations applied to it
#[derive(Debug, Clone)]
struct Versioned {
    record: PipelineRecord,
    version: u64,
}

/// Materialized state built from WAL operations
#[derive(Debug, Default)]
pub struct MaterializedState {
    items: HashMap<ItemId, Versioned>,
}

impl MaterializedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and version of a live (not removed) item
    pub fn get(&self, id: &ItemId) -> Option<(&PipelineRecord, u64)> {
        self.items
            .get(id)
            .filter(|v| !v.record.item().is_deleted())
            .map(|v| (&v.record, v.version))
    }

    /// All live items
    pub fn items(&self) -> impl Iterator<Item = &PipelineItem> {
        self.items
            .values()
            .map(|v| v.record.item())
            .filter(|item| !item.is_deleted())
    }

    /// Check an operation against the stored state without applying it
    pub fn check(&self, op: &Operation, expected_version: Option<u64>) -> Result<(), StoreError> {
        let item = op.item();
        let id = item.id();

        let next_sequence = match (op, self.items.get(id)) {
            (Operation::ItemCreate { .. }, Some(_)) => {
                return Err(StoreError::AlreadyExists(id.clone()))
            }
            (Operation::ItemCreate { .. }, None) => 1,
            (_, None) => return Err(StoreError::NotFound(id.clone())),
            (_, Some(stored)) => {
                if stored.record.item().is_deleted() {
                    return Err(StoreError::NotFound(id.clone()));
                }
                let expected = expected_version.unwrap_or(0);
                if expected != stored.version {
                    return Err(StoreError::ConcurrencyConflict {
                        id: id.clone(),
                        expected,
                        actual: stored.version,
                    });
                }
                cst_core::history::next_sequence(stored.record.history())
            }
        };

        if let Some(entry) = op.entry() {
            if entry.sequence() != next_sequence || entry.item_id() != id {
                return Err(StoreError::HistoryGap {
                    id: id.clone(),
                    expected: next_sequence,
                    actual: entry.sequence(),
                });
            }
        }

        if item.status().is_open() && !item.is_deleted() {
            if let Some(existing) = self.open_item_for(item) {
                return Err(StoreError::DuplicateOpenItem {
                    organization_id: item.organization_id().clone(),
                    existing: existing.clone(),
                });
            }
        }

        Ok(())
    }

    /// Another live open item for the same organization
    fn open_item_for(&self, item: &PipelineItem) -> Option<&ItemId> {
        self.items().find_map(|other| {
            (other.id() != item.id()
                && other.organization_id() == item.organization_id()
                && other.status().is_open())
            .then(|| other.id())
        })
    }

    /// Apply an operation to update the state, returning the item's new version
    pub fn apply(&mut self, op: &Operation) -> u64 {
        let id = op.item_id().clone();
        let (prior, version) = match self.items.remove(&id) {
            Some(stored) => (Some(stored.record), stored.version + 1),
            None => (None, 1),
        };
        let record = op.clone().into_record(prior);
        self.items.insert(id, Versioned { record, version });
        version
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
