// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline item status
//!
//! [`PipelineStatus`] is the bare status tag recorded in history entries and
//! used for filtering. [`Standing`] is the status an item actually carries,
//! together with the data that only exists in that status, so a back-burner
//! reason cannot exist without the item being on the back burner.

use crate::stage::Stage;
use serde::{Deserialize, Serialize};

/// Status tag of a pipeline item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStatus {
    Active,
    BackBurner,
    Passed,
    Converted,
}

impl PipelineStatus {
    pub const ALL: [PipelineStatus; 4] = [
        PipelineStatus::Active,
        PipelineStatus::BackBurner,
        PipelineStatus::Passed,
        PipelineStatus::Converted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStatus::Active => "ACTIVE",
            PipelineStatus::BackBurner => "BACK_BURNER",
            PipelineStatus::Passed => "PASSED",
            PipelineStatus::Converted => "CONVERTED",
        }
    }

    /// Converted deals are frozen
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStatus::Converted)
    }

    /// Statuses that count as an organization's open pipeline entry
    pub fn is_open(self) -> bool {
        matches!(self, PipelineStatus::Active | PipelineStatus::BackBurner)
    }

    /// Statuses from which an item may be reactivated
    pub fn is_reactivatable(self) -> bool {
        matches!(self, PipelineStatus::BackBurner | PipelineStatus::Passed)
    }
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The status an item is in, with its status-specific data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Standing {
    Active,
    BackBurner {
        back_burner_reason: String,
        stage_when_shelved: Stage,
    },
    Passed {
        passed_reason: String,
    },
    Converted,
}

impl Standing {
    pub fn status(&self) -> PipelineStatus {
        match self {
            Standing::Active => PipelineStatus::Active,
            Standing::BackBurner { .. } => PipelineStatus::BackBurner,
            Standing::Passed { .. } => PipelineStatus::Passed,
            Standing::Converted => PipelineStatus::Converted,
        }
    }

    pub fn back_burner_reason(&self) -> Option<&str> {
        match self {
            Standing::BackBurner {
                back_burner_reason, ..
            } => Some(back_burner_reason),
            _ => None,
        }
    }

    pub fn passed_reason(&self) -> Option<&str> {
        match self {
            Standing::Passed { passed_reason } => Some(passed_reason),
            _ => None,
        }
    }

    pub fn stage_when_shelved(&self) -> Option<Stage> {
        match self {
            Standing::BackBurner {
                stage_when_shelved, ..
            } => Some(*stage_when_shelved),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
