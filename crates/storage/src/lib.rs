// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cst-storage: Durable storage for pipeline items
//!
//! Items and their history are persisted as a write-ahead log of
//! [`Operation`](cst_core::Operation)s and materialized in memory on open.
//! Saves are checked against the stored version of the item.

mod error;
mod state;
mod store;
mod wal;

pub use error::StoreError;
pub use state::MaterializedState;
pub use store::{Commit, MemoryStore, PipelineStore, Snapshot, WalStore};
pub use wal::{Wal, WalEntry, WalError};
