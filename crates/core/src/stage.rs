// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline stages
//!
//! A deal moves through six fixed, totally ordered stages. Stages are
//! serialized as their number (1..=6) and no value outside that range can
//! be constructed.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// One of the six sequential steps of the deal pipeline
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub enum Stage {
    #[default]
    FirstMeeting = 1,
    QuantitativeDiligence = 2,
    PatrickMeeting = 3,
    LiveDiligence = 4,
    References = 5,
    Docs = 6,
}

impl Stage {
    /// All stages in pipeline order
    pub const ALL: [Stage; 6] = [
        Stage::FirstMeeting,
        Stage::QuantitativeDiligence,
        Stage::PatrickMeeting,
        Stage::LiveDiligence,
        Stage::References,
        Stage::Docs,
    ];

    pub const FIRST: Stage = Stage::FirstMeeting;
    pub const LAST: Stage = Stage::Docs;

    /// Validate a raw stage number
    pub fn new(number: i64) -> Result<Stage, EngineError> {
        match number {
            1 => Ok(Stage::FirstMeeting),
            2 => Ok(Stage::QuantitativeDiligence),
            3 => Ok(Stage::PatrickMeeting),
            4 => Ok(Stage::LiveDiligence),
            5 => Ok(Stage::References),
            6 => Ok(Stage::Docs),
            other => Err(EngineError::InvalidStage(other)),
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Display label shown on the board
    pub fn label(self) -> &'static str {
        match self {
            Stage::FirstMeeting => "First Meeting",
            Stage::QuantitativeDiligence => "Quantitative Diligence",
            Stage::PatrickMeeting => "Patrick Meeting",
            Stage::LiveDiligence => "Live Diligence",
            Stage::References => "References",
            Stage::Docs => "Docs",
        }
    }

    /// The following stage, or `None` at the final stage
    pub fn next(self) -> Option<Stage> {
        Stage::new(i64::from(self.number()) + 1).ok()
    }

    /// The preceding stage, or `None` at the first stage
    pub fn prev(self) -> Option<Stage> {
        Stage::new(i64::from(self.number()) - 1).ok()
    }

    pub fn is_last(self) -> bool {
        self == Stage::LAST
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.number(), self.label())
    }
}

impl TryFrom<i64> for Stage {
    type Error = EngineError;

    fn try_from(number: i64) -> Result<Self, Self::Error> {
        Stage::new(number)
    }
}

impl From<Stage> for i64 {
    fn from(stage: Stage) -> Self {
        i64::from(stage.number())
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
