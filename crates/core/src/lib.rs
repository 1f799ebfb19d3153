// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cst-core: Deal pipeline stage engine
//!
//! This crate provides:
//! - The six-stage deal pipeline model (stages, statuses, items, history)
//! - A pure stage engine validating and applying every transition
//! - Read-side projections: the kanban board and paginated item queries
//! - The access policy and the operations persisted to the write-ahead log

pub mod clock;
pub mod id;

// Domain model (order matters for dependencies)
pub mod stage;
pub mod status;
pub mod history;
pub mod item;

pub mod access;
pub mod board;
pub mod engine;
pub mod error;
pub mod operation;
pub mod query;

// Re-exports
pub use access::{Actor, UserRole};
pub use board::{BackBurnerCard, Board, BoardCard, BoardSummary, StageColumn};
pub use clock::{Clock, FakeClock, SystemClock};
pub use engine::{ItemEdit, NewItem, StageCommand, StageEngine, Transition};
pub use error::EngineError;
pub use history::StageHistoryEntry;
pub use id::{ContactId, EntryId, IdGen, ItemId, OrganizationId, SequentialIdGen, UserId, UuidIdGen};
pub use item::{PipelineItem, PipelineRecord};
pub use operation::Operation;
pub use query::{ItemQuery, Page, StatusFilter};
pub use stage::Stage;
pub use status::{PipelineStatus, Standing};
