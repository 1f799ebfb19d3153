// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline item entity
//!
//! A pipeline item is one organization's position in the deal pipeline.
//! Its fields are read-only outside this crate: every change goes through
//! [`StageEngine`](crate::engine::StageEngine).

use crate::history::StageHistoryEntry;
use crate::id::{ContactId, ItemId, OrganizationId, UserId};
use crate::stage::Stage;
use crate::status::{PipelineStatus, Standing};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An organization's current position in the deal pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineItem {
    pub(crate) id: ItemId,
    pub(crate) organization_id: OrganizationId,
    pub(crate) primary_contact_id: Option<ContactId>,
    pub(crate) owner_id: UserId,
    pub(crate) created_by: UserId,
    pub(crate) stage: Stage,
    #[serde(flatten)]
    pub(crate) standing: Standing,
    pub(crate) notes: Option<String>,
    pub(crate) entered_pipeline_at: DateTime<Utc>,
    pub(crate) last_stage_change_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    #[serde(default)]
    pub(crate) is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) deleted_at: Option<DateTime<Utc>>,
}

impl PipelineItem {
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn organization_id(&self) -> &OrganizationId {
        &self.organization_id
    }

    pub fn primary_contact_id(&self) -> Option<&ContactId> {
        self.primary_contact_id.as_ref()
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn standing(&self) -> &Standing {
        &self.standing
    }

    pub fn status(&self) -> PipelineStatus {
        self.standing.status()
    }

    pub fn back_burner_reason(&self) -> Option<&str> {
        self.standing.back_burner_reason()
    }

    pub fn passed_reason(&self) -> Option<&str> {
        self.standing.passed_reason()
    }

    pub fn stage_when_shelved(&self) -> Option<Stage> {
        self.standing.stage_when_shelved()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn entered_pipeline_at(&self) -> DateTime<Utc> {
        self.entered_pipeline_at
    }

    pub fn last_stage_change_at(&self) -> DateTime<Utc> {
        self.last_stage_change_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Converted items reject every operation
    pub fn is_locked(&self) -> bool {
        self.status().is_terminal()
    }

    /// Whole days since the item entered the pipeline
    pub fn days_in_pipeline(&self, now: DateTime<Utc>) -> i64 {
        whole_days(self.entered_pipeline_at, now)
    }

    /// Whole days since the stage was last assigned
    pub fn days_in_stage(&self, now: DateTime<Utc>) -> i64 {
        whole_days(self.last_stage_change_at, now)
    }
}

fn whole_days(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - since).num_days().max(0)
}

/// A pipeline item together with its ordered stage history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRecord {
    pub(crate) item: PipelineItem,
    pub(crate) history: Vec<StageHistoryEntry>,
}

impl PipelineRecord {
    /// Reassemble a record from persisted parts.
    ///
    /// History is ordered by sequence number.
    pub(crate) fn from_parts(item: PipelineItem, mut history: Vec<StageHistoryEntry>) -> Self {
        history.sort_by_key(|e| e.sequence);
        Self { item, history }
    }

    pub fn item(&self) -> &PipelineItem {
        &self.item
    }

    pub fn history(&self) -> &[StageHistoryEntry] {
        &self.history
    }

    pub fn into_parts(self) -> (PipelineItem, Vec<StageHistoryEntry>) {
        (self.item, self.history)
    }

    pub fn id(&self) -> &ItemId {
        &self.item.id
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
