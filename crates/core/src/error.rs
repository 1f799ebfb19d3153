// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the stage engine

use crate::id::ItemId;
use thiserror::Error;

/// Errors returned by stage engine operations.
///
/// Messages are written to be shown to users verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid stage {0}: stage must be between 1 and 6")]
    InvalidStage(i64),
    #[error("cannot {action}: {reason}")]
    InvalidTransition {
        action: &'static str,
        reason: String,
    },
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },
    #[error("pipeline item {0} is CONVERTED and can no longer be modified")]
    ItemLocked(ItemId),
}

impl EngineError {
    pub(crate) fn transition(action: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidTransition {
            action,
            reason: reason.into(),
        }
    }

    pub(crate) fn required(field: &'static str) -> Self {
        EngineError::Validation {
            field,
            reason: "a non-empty value is required".to_string(),
        }
    }
}
