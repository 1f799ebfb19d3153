// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kanban board projection
//!
//! Read-only aggregation of pipeline items for the board view. Building a
//! board never mutates items.

use crate::item::PipelineItem;
use crate::stage::Stage;
use crate::status::PipelineStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An item on the board with its derived day counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardCard {
    #[serde(flatten)]
    pub item: PipelineItem,
    pub days_in_stage: i64,
    pub days_in_pipeline: i64,
}

impl BoardCard {
    pub fn new(item: &PipelineItem, now: DateTime<Utc>) -> Self {
        Self {
            days_in_stage: item.days_in_stage(now),
            days_in_pipeline: item.days_in_pipeline(now),
            item: item.clone(),
        }
    }
}

/// One column of the board: the ACTIVE items at a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageColumn {
    pub stage: Stage,
    pub label: &'static str,
    pub items: Vec<BoardCard>,
}

/// A back-burner item with the stage it was shelved at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackBurnerCard {
    #[serde(flatten)]
    pub card: BoardCard,
    /// Serialized through the flattened item
    #[serde(skip)]
    pub stage_when_shelved: Option<Stage>,
    pub stage_when_shelved_label: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    pub total_active: usize,
    pub total_back_burner: usize,
    pub total_passed: usize,
    pub total_converted: usize,
}

/// The full kanban board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    /// Always six columns, in stage order
    pub stages: Vec<StageColumn>,
    pub back_burner: Vec<BackBurnerCard>,
    pub passed: Vec<BoardCard>,
    pub converted: Vec<BoardCard>,
    pub summary: BoardSummary,
}

impl Board {
    /// Group items by stage and status.
    ///
    /// Removed items are skipped. Active columns list the longest-waiting
    /// item first; the other collections list the most recently moved first.
    pub fn build<'a>(items: impl IntoIterator<Item = &'a PipelineItem>, now: DateTime<Utc>) -> Self {
        let mut active: Vec<&PipelineItem> = Vec::new();
        let mut back_burner: Vec<&PipelineItem> = Vec::new();
        let mut passed: Vec<&PipelineItem> = Vec::new();
        let mut converted: Vec<&PipelineItem> = Vec::new();

        for item in items.into_iter().filter(|i| !i.is_deleted()) {
            match item.status() {
                PipelineStatus::Active => active.push(item),
                PipelineStatus::BackBurner => back_burner.push(item),
                PipelineStatus::Passed => passed.push(item),
                PipelineStatus::Converted => converted.push(item),
            }
        }

        active.sort_by_key(|i| i.last_stage_change_at());
        for group in [&mut back_burner, &mut passed, &mut converted] {
            group.sort_by_key(|i| std::cmp::Reverse(i.updated_at()));
        }

        let summary = BoardSummary {
            total_active: active.len(),
            total_back_burner: back_burner.len(),
            total_passed: passed.len(),
            total_converted: converted.len(),
        };

        let stages = Stage::ALL
            .into_iter()
            .map(|stage| StageColumn {
                stage,
                label: stage.label(),
                items: active
                    .iter()
                    .filter(|i| i.stage() == stage)
                    .map(|i| BoardCard::new(i, now))
                    .collect(),
            })
            .collect();

        let back_burner = back_burner
            .into_iter()
            .map(|item| {
                let stage_when_shelved = item.stage_when_shelved();
                BackBurnerCard {
                    card: BoardCard::new(item, now),
                    stage_when_shelved,
                    stage_when_shelved_label: stage_when_shelved.map(Stage::label),
                }
            })
            .collect();

        let cards = |group: Vec<&PipelineItem>| -> Vec<BoardCard> {
            group.into_iter().map(|i| BoardCard::new(i, now)).collect()
        };

        Board {
            stages,
            back_burner,
            passed: cards(passed),
            converted: cards(converted),
            summary,
        }
    }

    pub fn column(&self, stage: Stage) -> Option<&StageColumn> {
        self.stages.iter().find(|c| c.stage == stage)
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
