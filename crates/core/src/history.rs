// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage history
//!
//! History is append-only. Entries are only ever produced by the stage
//! engine, one per transition, and are read-only outside this crate. Each
//! carries a per-item sequence number that fixes its order independently of
//! timestamps.

use crate::id::{EntryId, ItemId, UserId};
use crate::stage::Stage;
use crate::status::PipelineStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable record of a stage or status transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageHistoryEntry {
    pub(crate) id: EntryId,
    pub(crate) item_id: ItemId,
    /// Position in the item's history, starting at 1 for the creation entry
    pub(crate) sequence: u64,
    /// `None` only for the creation entry
    pub(crate) from_stage: Option<Stage>,
    pub(crate) to_stage: Stage,
    /// `None` only for the creation entry
    pub(crate) from_status: Option<PipelineStatus>,
    pub(crate) to_status: PipelineStatus,
    pub(crate) note: Option<String>,
    pub(crate) changed_by: UserId,
    pub(crate) changed_at: DateTime<Utc>,
}

impl StageHistoryEntry {
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn from_stage(&self) -> Option<Stage> {
        self.from_stage
    }

    pub fn to_stage(&self) -> Stage {
        self.to_stage
    }

    pub fn from_status(&self) -> Option<PipelineStatus> {
        self.from_status
    }

    pub fn to_status(&self) -> PipelineStatus {
        self.to_status
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn changed_by(&self) -> &UserId {
        &self.changed_by
    }

    pub fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }

    pub fn is_creation(&self) -> bool {
        self.from_stage.is_none()
    }

    pub fn changes_stage(&self) -> bool {
        self.from_stage != Some(self.to_stage)
    }

    pub fn changes_status(&self) -> bool {
        self.from_status != Some(self.to_status)
    }
}

/// Sequence number for the next entry appended to `history`
pub fn next_sequence(history: &[StageHistoryEntry]) -> u64 {
    history.iter().map(|e| e.sequence).max().unwrap_or(0) + 1
}

/// Stage the item was at when it was last in the active pipeline.
///
/// This is the `to_stage` of the latest entry (by sequence) that left the
/// item ACTIVE.
pub fn last_active_stage(history: &[StageHistoryEntry]) -> Option<Stage> {
    history
        .iter()
        .filter(|e| e.to_status == PipelineStatus::Active)
        .max_by_key(|e| e.sequence)
        .map(|e| e.to_stage)
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
