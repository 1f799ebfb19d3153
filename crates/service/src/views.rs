// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! View models returned to the presentation layer
//!
//! Views add stage labels, derived day counts and display names to the
//! domain types. A name the directory cannot resolve is left out.

use chrono::{DateTime, Utc};
use cst_adapters::DirectoryAdapter;
use cst_core::{
    Board, BoardSummary, ContactId, OrganizationId, PipelineItem, PipelineRecord, Stage,
    StageHistoryEntry, UserId,
};
use serde::Serialize;
use std::collections::HashMap;

/// Memoized directory lookups for one request
pub(crate) struct Names<'a, D> {
    directory: &'a D,
    users: HashMap<UserId, Option<String>>,
    organizations: HashMap<OrganizationId, Option<String>>,
    contacts: HashMap<ContactId, Option<String>>,
}

impl<'a, D: DirectoryAdapter> Names<'a, D> {
    pub(crate) fn new(directory: &'a D) -> Self {
        Self {
            directory,
            users: HashMap::new(),
            organizations: HashMap::new(),
            contacts: HashMap::new(),
        }
    }

    async fn user(&mut self, id: &UserId) -> Option<String> {
        if let Some(name) = self.users.get(id) {
            return name.clone();
        }
        let name = self.directory.user_name(id).await.unwrap_or_else(|e| {
            tracing::warn!(user = %id, error = %e, "user name unavailable");
            None
        });
        self.users.insert(id.clone(), name.clone());
        name
    }

    async fn organization(&mut self, id: &OrganizationId) -> Option<String> {
        if let Some(name) = self.organizations.get(id) {
            return name.clone();
        }
        let name = self
            .directory
            .organization_name(id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(organization = %id, error = %e, "organization name unavailable");
                None
            });
        self.organizations.insert(id.clone(), name.clone());
        name
    }

    async fn contact(&mut self, id: Option<&ContactId>) -> Option<String> {
        let id = id?;
        if let Some(name) = self.contacts.get(id) {
            return name.clone();
        }
        let name = self.directory.contact_name(id).await.unwrap_or_else(|e| {
            tracing::warn!(contact = %id, error = %e, "contact name unavailable");
            None
        });
        self.contacts.insert(id.clone(), name.clone());
        name
    }
}

/// A pipeline item with labels, names and day counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: PipelineItem,
    pub stage_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_contact_name: Option<String>,
    pub days_in_pipeline: i64,
    pub days_in_stage: i64,
}

impl ItemView {
    pub(crate) async fn build<D: DirectoryAdapter>(
        item: &PipelineItem,
        now: DateTime<Utc>,
        names: &mut Names<'_, D>,
    ) -> Self {
        Self {
            stage_label: item.stage().label(),
            organization_name: names.organization(item.organization_id()).await,
            owner_name: names.user(item.owner_id()).await,
            primary_contact_name: names.contact(item.primary_contact_id()).await,
            days_in_pipeline: item.days_in_pipeline(now),
            days_in_stage: item.days_in_stage(now),
            item: item.clone(),
        }
    }
}

/// One history entry with stage labels and the author's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    #[serde(flatten)]
    pub entry: StageHistoryEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_stage_label: Option<&'static str>,
    pub to_stage_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_by_name: Option<String>,
}

impl HistoryView {
    async fn build<D: DirectoryAdapter>(entry: &StageHistoryEntry, names: &mut Names<'_, D>) -> Self {
        Self {
            from_stage_label: entry.from_stage().map(Stage::label),
            to_stage_label: entry.to_stage().label(),
            changed_by_name: names.user(entry.changed_by()).await,
            entry: entry.clone(),
        }
    }
}

/// An item with its full history, newest entry first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDetailView {
    #[serde(flatten)]
    pub item: ItemView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
    pub history: Vec<HistoryView>,
}

impl ItemDetailView {
    pub(crate) async fn build<D: DirectoryAdapter>(
        record: &PipelineRecord,
        now: DateTime<Utc>,
        names: &mut Names<'_, D>,
    ) -> Self {
        let item = ItemView::build(record.item(), now, names).await;
        let created_by_name = names.user(record.item().created_by()).await;
        let mut history = Vec::with_capacity(record.history().len());
        for entry in record.history().iter().rev() {
            history.push(HistoryView::build(entry, names).await);
        }
        Self {
            item,
            created_by_name,
            history,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageColumnView {
    pub stage: Stage,
    pub label: &'static str,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackBurnerView {
    #[serde(flatten)]
    pub item: ItemView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_when_shelved_label: Option<&'static str>,
}

/// The kanban board with display names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub stages: Vec<StageColumnView>,
    pub back_burner: Vec<BackBurnerView>,
    pub passed: Vec<ItemView>,
    pub converted: Vec<ItemView>,
    pub summary: BoardSummary,
}

impl BoardView {
    pub(crate) async fn build<D: DirectoryAdapter>(
        board: &Board,
        now: DateTime<Utc>,
        names: &mut Names<'_, D>,
    ) -> Self {
        let mut stages = Vec::with_capacity(board.stages.len());
        for column in &board.stages {
            let mut items = Vec::with_capacity(column.items.len());
            for card in &column.items {
                items.push(ItemView::build(&card.item, now, names).await);
            }
            stages.push(StageColumnView {
                stage: column.stage,
                label: column.label,
                items,
            });
        }

        let mut back_burner = Vec::with_capacity(board.back_burner.len());
        for card in &board.back_burner {
            back_burner.push(BackBurnerView {
                item: ItemView::build(&card.card.item, now, names).await,
                stage_when_shelved_label: card.stage_when_shelved_label,
            });
        }

        let mut passed = Vec::with_capacity(board.passed.len());
        for card in &board.passed {
            passed.push(ItemView::build(&card.item, now, names).await);
        }
        let mut converted = Vec::with_capacity(board.converted.len());
        for card in &board.converted {
            converted.push(ItemView::build(&card.item, now, names).await);
        }

        Self {
            stages,
            back_burner,
            passed,
            converted,
            summary: board.summary,
        }
    }

    pub fn column(&self, stage: Stage) -> Option<&StageColumnView> {
        self.stages.iter().find(|c| c.stage == stage)
    }
}
