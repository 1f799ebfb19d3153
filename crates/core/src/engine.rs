// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage engine
//!
//! The single source of truth for how a pipeline item moves between stages
//! and statuses. Every operation is a pure function of the current record
//! and its inputs: it either returns a [`Transition`] (the new item plus the
//! history entry to append) or a typed [`EngineError`]. The engine performs
//! no I/O and never logs.
//!
//! Checks run in a fixed order for every operation on an existing item:
//! 1. `ItemLocked` if the item is CONVERTED
//! 2. input validation (`Validation`, `InvalidStage`)
//! 3. status and stage preconditions (`InvalidTransition`)

use crate::clock::Clock;
use crate::error::EngineError;
use crate::history::{last_active_stage, next_sequence, StageHistoryEntry};
use crate::id::{ContactId, EntryId, IdGen, ItemId, OrganizationId, UserId};
use crate::item::{PipelineItem, PipelineRecord};
use crate::stage::Stage;
use crate::status::{PipelineStatus, Standing};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Note recorded on the creation entry
pub const CREATED_NOTE: &str = "Pipeline item created";

/// Reason recorded when an item is removed without a prior passed reason
pub const REMOVED_REASON: &str = "Removed";

/// Input for creating a pipeline item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub organization_id: OrganizationId,
    pub owner_id: UserId,
    #[serde(default)]
    pub primary_contact_id: Option<ContactId>,
    /// Raw stage number, validated on create
    #[serde(default = "default_starting_stage")]
    pub starting_stage: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_starting_stage() -> i64 {
    i64::from(Stage::FIRST.number())
}

impl NewItem {
    pub fn new(organization_id: impl Into<OrganizationId>, owner_id: impl Into<UserId>) -> Self {
        Self {
            organization_id: organization_id.into(),
            owner_id: owner_id.into(),
            primary_contact_id: None,
            starting_stage: default_starting_stage(),
            notes: None,
        }
    }

    pub fn with_primary_contact(self, contact_id: impl Into<ContactId>) -> Self {
        Self {
            primary_contact_id: Some(contact_id.into()),
            ..self
        }
    }

    pub fn at_stage(self, starting_stage: i64) -> Self {
        Self {
            starting_stage,
            ..self
        }
    }

    pub fn with_notes(self, notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..self
        }
    }
}

/// Metadata changes applied by [`StageEngine::edit`].
///
/// `None` leaves a field untouched. Nullable fields use a nested option so
/// they can be cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEdit {
    #[serde(default)]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub primary_contact_id: Option<Option<ContactId>>,
}

impl ItemEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(self, notes: impl Into<String>) -> Self {
        Self {
            notes: Some(Some(notes.into())),
            ..self
        }
    }

    pub fn clear_notes(self) -> Self {
        Self {
            notes: Some(None),
            ..self
        }
    }

    pub fn owner(self, owner_id: impl Into<UserId>) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            ..self
        }
    }

    pub fn primary_contact(self, contact_id: impl Into<ContactId>) -> Self {
        Self {
            primary_contact_id: Some(Some(contact_id.into())),
            ..self
        }
    }

    pub fn clear_primary_contact(self) -> Self {
        Self {
            primary_contact_id: Some(None),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_none() && self.owner_id.is_none() && self.primary_contact_id.is_none()
    }
}

/// A single engine operation on an existing item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum StageCommand {
    Advance {
        #[serde(default)]
        note: Option<String>,
    },
    Revert {
        note: String,
    },
    Shelve {
        reason: String,
    },
    Pass {
        reason: String,
    },
    Reactivate {
        note: String,
        #[serde(default)]
        target_stage: Option<i64>,
    },
    Convert,
    Edit {
        edit: ItemEdit,
    },
    Remove,
}

impl StageCommand {
    pub fn name(&self) -> &'static str {
        match self {
            StageCommand::Advance { .. } => "advance",
            StageCommand::Revert { .. } => "revert",
            StageCommand::Shelve { .. } => "shelve",
            StageCommand::Pass { .. } => "pass",
            StageCommand::Reactivate { .. } => "reactivate",
            StageCommand::Convert => "convert",
            StageCommand::Edit { .. } => "edit",
            StageCommand::Remove => "remove",
        }
    }
}

/// Result of a successful engine operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    item: PipelineItem,
    entry: Option<StageHistoryEntry>,
}

impl Transition {
    /// The item after the operation
    pub fn item(&self) -> &PipelineItem {
        &self.item
    }

    /// History entry to append; `None` only for metadata edits
    pub fn entry(&self) -> Option<&StageHistoryEntry> {
        self.entry.as_ref()
    }

    pub fn into_parts(self) -> (PipelineItem, Option<StageHistoryEntry>) {
        (self.item, self.entry)
    }

    /// Build the record for a freshly created item
    pub fn into_record(self) -> PipelineRecord {
        PipelineRecord::from_parts(self.item, self.entry.into_iter().collect())
    }
}

impl PipelineRecord {
    /// Apply a transition produced from this record
    pub fn apply(&mut self, transition: Transition) {
        let (item, entry) = transition.into_parts();
        self.item = item;
        self.history.extend(entry);
    }
}

/// Validates and applies every transition to a pipeline item
#[derive(Clone)]
pub struct StageEngine<C: Clock, G: IdGen> {
    clock: C,
    ids: G,
}

impl<C: Clock, G: IdGen> StageEngine<C, G> {
    pub fn new(clock: C, ids: G) -> Self {
        Self { clock, ids }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Create a new ACTIVE item with its creation history entry
    pub fn create(&self, new: NewItem, created_by: &UserId) -> Result<Transition, EngineError> {
        if new.organization_id.as_str().trim().is_empty() {
            return Err(EngineError::required("organization_id"));
        }
        if new.owner_id.as_str().trim().is_empty() {
            return Err(EngineError::required("owner_id"));
        }
        let stage = Stage::new(new.starting_stage)?;
        let now = self.clock.now();
        let item = PipelineItem {
            id: ItemId(self.ids.next()),
            organization_id: new.organization_id,
            primary_contact_id: new.primary_contact_id,
            owner_id: new.owner_id,
            created_by: created_by.clone(),
            stage,
            standing: Standing::Active,
            notes: optional(new.notes),
            entered_pipeline_at: now,
            last_stage_change_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };
        let entry = StageHistoryEntry {
            id: EntryId(self.ids.next()),
            item_id: item.id.clone(),
            sequence: 1,
            from_stage: None,
            to_stage: stage,
            from_status: None,
            to_status: PipelineStatus::Active,
            note: Some(CREATED_NOTE.to_string()),
            changed_by: created_by.clone(),
            changed_at: now,
        };
        Ok(Transition {
            item,
            entry: Some(entry),
        })
    }

    /// Dispatch a command to the matching operation
    pub fn execute(
        &self,
        record: &PipelineRecord,
        changed_by: &UserId,
        command: StageCommand,
    ) -> Result<Transition, EngineError> {
        match command {
            StageCommand::Advance { note } => self.advance(record, changed_by, note),
            StageCommand::Revert { note } => self.revert(record, changed_by, &note),
            StageCommand::Shelve { reason } => self.shelve(record, changed_by, &reason),
            StageCommand::Pass { reason } => self.pass(record, changed_by, &reason),
            StageCommand::Reactivate { note, target_stage } => {
                self.reactivate(record, changed_by, &note, target_stage)
            }
            StageCommand::Convert => self.convert(record, changed_by),
            StageCommand::Edit { edit } => self.edit(record, edit),
            StageCommand::Remove => self.remove(record, changed_by),
        }
    }

    /// Move an ACTIVE item to the next stage
    pub fn advance(
        &self,
        record: &PipelineRecord,
        changed_by: &UserId,
        note: Option<String>,
    ) -> Result<Transition, EngineError> {
        let item = guard(record, "advance")?;
        let note = optional(note);
        require_active(item, "advance")?;
        let next = item.stage.next().ok_or_else(|| {
            EngineError::transition(
                "advance",
                "pipeline item is already at the final stage (6 - Docs); convert it instead",
            )
        })?;

        let now = self.clock.now();
        let mut updated = item.clone();
        updated.stage = next;
        updated.last_stage_change_at = now;
        Ok(self.finish(record, changed_by, updated, note, now))
    }

    /// Move an ACTIVE item back one stage; a justification is mandatory
    pub fn revert(
        &self,
        record: &PipelineRecord,
        changed_by: &UserId,
        note: &str,
    ) -> Result<Transition, EngineError> {
        let item = guard(record, "revert")?;
        let note = required("note", note)?;
        require_active(item, "revert")?;
        let prev = item.stage.prev().ok_or_else(|| {
            EngineError::transition(
                "revert",
                "pipeline item is already at the first stage (1 - First Meeting)",
            )
        })?;

        let now = self.clock.now();
        let mut updated = item.clone();
        updated.stage = prev;
        updated.last_stage_change_at = now;
        Ok(self.finish(record, changed_by, updated, Some(note), now))
    }

    /// Put an ACTIVE item on the back burner, keeping its stage
    pub fn shelve(
        &self,
        record: &PipelineRecord,
        changed_by: &UserId,
        reason: &str,
    ) -> Result<Transition, EngineError> {
        let item = guard(record, "shelve")?;
        let reason = required("back_burner_reason", reason)?;
        require_active(item, "shelve")?;

        let now = self.clock.now();
        let mut updated = item.clone();
        updated.standing = Standing::BackBurner {
            back_burner_reason: reason.clone(),
            stage_when_shelved: item.stage,
        };
        Ok(self.finish(record, changed_by, updated, Some(reason), now))
    }

    /// Decline an ACTIVE item
    pub fn pass(
        &self,
        record: &PipelineRecord,
        changed_by: &UserId,
        reason: &str,
    ) -> Result<Transition, EngineError> {
        let item = guard(record, "pass")?;
        let reason = required("passed_reason", reason)?;
        require_active(item, "pass")?;

        let now = self.clock.now();
        let mut updated = item.clone();
        updated.standing = Standing::Passed {
            passed_reason: reason.clone(),
        };
        Ok(self.finish(record, changed_by, updated, Some(reason), now))
    }

    /// Return a BACK_BURNER or PASSED item to the active pipeline.
    ///
    /// Without an explicit target the item resumes at the stage it was at
    /// when it last left the active pipeline.
    pub fn reactivate(
        &self,
        record: &PipelineRecord,
        changed_by: &UserId,
        note: &str,
        target_stage: Option<i64>,
    ) -> Result<Transition, EngineError> {
        let item = guard(record, "reactivate")?;
        let note = required("note", note)?;
        let target = target_stage.map(Stage::new).transpose()?;
        if !item.status().is_reactivatable() {
            return Err(EngineError::transition(
                "reactivate",
                format!(
                    "pipeline item is {}; only BACK_BURNER or PASSED items can be reactivated",
                    item.status()
                ),
            ));
        }

        let resume_at = target
            .or_else(|| last_active_stage(record.history()))
            .unwrap_or(item.stage);

        let now = self.clock.now();
        let mut updated = item.clone();
        updated.standing = Standing::Active;
        updated.stage = resume_at;
        updated.last_stage_change_at = now;
        Ok(self.finish(record, changed_by, updated, Some(note), now))
    }

    /// Mark an ACTIVE item at the Docs stage as won. This is terminal.
    pub fn convert(
        &self,
        record: &PipelineRecord,
        changed_by: &UserId,
    ) -> Result<Transition, EngineError> {
        let item = guard(record, "convert")?;
        require_active(item, "convert")?;
        if !item.stage.is_last() {
            return Err(EngineError::transition(
                "convert",
                format!(
                    "pipeline item is at stage {}; only items at stage {} can be converted",
                    item.stage,
                    Stage::LAST
                ),
            ));
        }

        let now = self.clock.now();
        let mut updated = item.clone();
        updated.standing = Standing::Converted;
        Ok(self.finish(record, changed_by, updated, None, now))
    }

    /// Update informational fields. Edits are not transitions and append no
    /// history entry.
    pub fn edit(&self, record: &PipelineRecord, edit: ItemEdit) -> Result<Transition, EngineError> {
        let item = guard(record, "edit")?;
        let mut updated = item.clone();

        if let Some(notes) = edit.notes {
            updated.notes = optional(notes);
        }
        if let Some(owner_id) = edit.owner_id {
            if owner_id.as_str().trim().is_empty() {
                return Err(EngineError::required("owner_id"));
            }
            updated.owner_id = owner_id;
        }
        if let Some(contact_id) = edit.primary_contact_id {
            updated.primary_contact_id = contact_id;
        }

        if updated != *item {
            updated.updated_at = self.clock.now();
        }
        Ok(Transition {
            item: updated,
            entry: None,
        })
    }

    /// Soft-delete an item. It is marked PASSED and hidden from stores.
    pub fn remove(
        &self,
        record: &PipelineRecord,
        changed_by: &UserId,
    ) -> Result<Transition, EngineError> {
        let item = guard(record, "remove")?;
        let passed_reason = item
            .passed_reason()
            .unwrap_or(REMOVED_REASON)
            .to_string();

        let now = self.clock.now();
        let mut updated = item.clone();
        updated.standing = Standing::Passed { passed_reason };
        updated.is_deleted = true;
        updated.deleted_at = Some(now);
        Ok(self.finish(
            record,
            changed_by,
            updated,
            Some(REMOVED_REASON.to_string()),
            now,
        ))
    }

    /// Stamp the updated item and build the history entry for it
    fn finish(
        &self,
        record: &PipelineRecord,
        changed_by: &UserId,
        mut updated: PipelineItem,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Transition {
        let before = record.item();
        updated.updated_at = now;
        let entry = StageHistoryEntry {
            id: EntryId(self.ids.next()),
            item_id: updated.id.clone(),
            sequence: next_sequence(record.history()),
            from_stage: Some(before.stage),
            to_stage: updated.stage,
            from_status: Some(before.status()),
            to_status: updated.status(),
            note,
            changed_by: changed_by.clone(),
            changed_at: now,
        };
        Transition {
            item: updated,
            entry: Some(entry),
        }
    }
}

/// Reject operations on converted or removed items
fn guard<'a>(
    record: &'a PipelineRecord,
    action: &'static str,
) -> Result<&'a PipelineItem, EngineError> {
    let item = record.item();
    if item.is_locked() {
        return Err(EngineError::ItemLocked(item.id.clone()));
    }
    if item.is_deleted {
        return Err(EngineError::transition(
            action,
            "pipeline item has been removed",
        ));
    }
    Ok(item)
}

fn require_active(item: &PipelineItem, action: &'static str) -> Result<(), EngineError> {
    if item.status() == PipelineStatus::Active {
        Ok(())
    } else {
        Err(EngineError::transition(
            action,
            format!("pipeline item is {}; only ACTIVE items can {}", item.status(), action),
        ))
    }
}

/// Trimmed text that must not be blank
fn required(field: &'static str, value: &str) -> Result<String, EngineError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(EngineError::required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Trimmed optional text; blank collapses to `None`
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
