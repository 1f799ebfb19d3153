// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline item stores
//!
//! Every save is checked against the version the caller loaded, so two
//! requests racing on the same item cannot both commit.

use crate::error::StoreError;
use crate::state::MaterializedState;
use crate::wal::Wal;
use cst_core::{ItemId, Operation, PipelineItem, PipelineRecord, Transition};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// A loaded record and the version it was read at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub record: PipelineRecord,
    pub version: u64,
}

/// A change to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub operation: Operation,
    /// Version the change was computed from; `None` for creation
    pub expected_version: Option<u64>,
}

impl Commit {
    /// Persist a newly created item
    pub fn create(transition: Transition) -> Result<Self, StoreError> {
        let id = transition.item().id().clone();
        let operation = Operation::create(transition).ok_or(StoreError::HistoryGap {
            id,
            expected: 1,
            actual: 0,
        })?;
        Ok(Self {
            operation,
            expected_version: None,
        })
    }

    /// Persist a change computed from `snapshot`
    pub fn change(snapshot: &Snapshot, transition: Transition) -> Self {
        Self {
            operation: Operation::change(transition),
            expected_version: Some(snapshot.version),
        }
    }

    pub fn item_id(&self) -> &ItemId {
        self.operation.item_id()
    }
}

/// Persistence for pipeline items and their history
pub trait PipelineStore: Send + Sync {
    /// Load a live item; removed items are not found
    fn load(&self, id: &ItemId) -> Result<Snapshot, StoreError>;

    /// Persist a change, returning the item's new version
    fn save(&self, commit: Commit) -> Result<u64, StoreError>;

    /// All live items
    fn list_all(&self) -> Result<Vec<PipelineItem>, StoreError>;
}

fn load_from(state: &MaterializedState, id: &ItemId) -> Result<Snapshot, StoreError> {
    state
        .get(id)
        .map(|(record, version)| Snapshot {
            record: record.clone(),
            version,
        })
        .ok_or_else(|| StoreError::NotFound(id.clone()))
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MaterializedState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MaterializedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PipelineStore for MemoryStore {
    fn load(&self, id: &ItemId) -> Result<Snapshot, StoreError> {
        load_from(&self.state(), id)
    }

    fn save(&self, commit: Commit) -> Result<u64, StoreError> {
        let mut state = self.state();
        state.check(&commit.operation, commit.expected_version)?;
        Ok(state.apply(&commit.operation))
    }

    fn list_all(&self) -> Result<Vec<PipelineItem>, StoreError> {
        Ok(self.state().items().cloned().collect())
    }
}

struct WalInner {
    wal: Wal,
    state: MaterializedState,
}

/// Store backed by a write-ahead log
///
/// The log is replayed into memory on open; each save is checked, appended
/// and synced before it is applied.
pub struct WalStore {
    path: PathBuf,
    inner: Mutex<WalInner>,
}

impl WalStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let (wal, entries) = Wal::recover(path)?;
        let mut state = MaterializedState::new();
        for entry in &entries {
            state.apply(&entry.operation);
        }
        tracing::debug!(
            path = %path.display(),
            entries = entries.len(),
            "replayed pipeline WAL"
        );
        Ok(Self {
            path: path.to_path_buf(),
            inner: Mutex::new(WalInner { wal, state }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sequence number of the last WAL entry
    pub fn sequence(&self) -> u64 {
        self.inner().wal.sequence()
    }

    fn inner(&self) -> MutexGuard<'_, WalInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PipelineStore for WalStore {
    fn load(&self, id: &ItemId) -> Result<Snapshot, StoreError> {
        load_from(&self.inner().state, id)
    }

    fn save(&self, commit: Commit) -> Result<u64, StoreError> {
        let mut inner = self.inner();
        inner.state.check(&commit.operation, commit.expected_version)?;
        inner.wal.append(&commit.operation)?;
        Ok(inner.state.apply(&commit.operation))
    }

    fn list_all(&self) -> Result<Vec<PipelineItem>, StoreError> {
        Ok(self.inner().state.items().cloned().collect())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
