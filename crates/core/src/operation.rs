// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations for the write-ahead log

use crate::engine::Transition;
use crate::history::StageHistoryEntry;
use crate::id::ItemId;
use crate::item::{PipelineItem, PipelineRecord};
use serde::{Deserialize, Serialize};

/// Operations that can be persisted to the WAL
///
/// Each operation carries the full post-transition item so replay never
/// re-runs engine rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Create a new pipeline item with its creation entry
    ItemCreate {
        item: PipelineItem,
        entry: StageHistoryEntry,
    },

    /// Apply a stage or status transition
    ItemTransition {
        item: PipelineItem,
        entry: StageHistoryEntry,
    },

    /// Replace editable fields without a history entry
    ItemUpdate { item: PipelineItem },
}

impl Operation {
    /// Operation recording a creation transition.
    ///
    /// Returns `None` if the transition carries no history entry.
    pub fn create(transition: Transition) -> Option<Self> {
        match transition.into_parts() {
            (item, Some(entry)) => Some(Operation::ItemCreate { item, entry }),
            (_, None) => None,
        }
    }

    /// Operation recording a change to an existing item
    pub fn change(transition: Transition) -> Self {
        match transition.into_parts() {
            (item, Some(entry)) => Operation::ItemTransition { item, entry },
            (item, None) => Operation::ItemUpdate { item },
        }
    }

    pub fn item(&self) -> &PipelineItem {
        match self {
            Operation::ItemCreate { item, .. }
            | Operation::ItemTransition { item, .. }
            | Operation::ItemUpdate { item } => item,
        }
    }

    pub fn item_id(&self) -> &ItemId {
        self.item().id()
    }

    pub fn entry(&self) -> Option<&StageHistoryEntry> {
        match self {
            Operation::ItemCreate { entry, .. } | Operation::ItemTransition { entry, .. } => {
                Some(entry)
            }
            Operation::ItemUpdate { .. } => None,
        }
    }

    /// Fold this operation into its item's stored record.
    ///
    /// `prior` is `None` when the item has not been stored yet.
    pub fn into_record(self, prior: Option<PipelineRecord>) -> PipelineRecord {
        let mut history = prior.map(|record| record.history).unwrap_or_default();
        let (item, entry) = match self {
            Operation::ItemCreate { item, entry } | Operation::ItemTransition { item, entry } => {
                (item, Some(entry))
            }
            Operation::ItemUpdate { item } => (item, None),
        };
        history.extend(entry);
        PipelineRecord::from_parts(item, history)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::ItemCreate { .. } => "item_create",
            Operation::ItemTransition { .. } => "item_transition",
            Operation::ItemUpdate { .. } => "item_update",
        }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
