// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log for durable storage
//!
//! One JSON entry per line, each carrying a sequence number and a CRC32
//! checksum of its serialized operation. An interrupted append leaves at
//! most a torn final line, which is truncated when the log is reopened.

use cst_core::Operation;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupted entry at line {line}: {reason}")]
    Corrupted { line: u64, reason: String },
    #[error("checksum mismatch at line {line}")]
    ChecksumMismatch { line: u64 },
}

/// A single entry in the write-ahead log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalEntry {
    /// Monotonically increasing sequence number
    pub sequence: u64,
    /// The operation being recorded
    pub operation: Operation,
    /// CRC32 checksum of the serialized operation
    pub checksum: u32,
}

impl WalEntry {
    pub fn new(sequence: u64, operation: Operation) -> Result<Self, WalError> {
        let checksum = checksum(&operation)?;
        Ok(Self {
            sequence,
            operation,
            checksum,
        })
    }

    pub fn verify(&self) -> bool {
        checksum(&self.operation).is_ok_and(|sum| sum == self.checksum)
    }
}

fn checksum(operation: &Operation) -> Result<u32, WalError> {
    let json = serde_json::to_string(operation)?;
    Ok(crc32fast::hash(json.as_bytes()))
}

/// Result of scanning a WAL file
struct Scan {
    entries: Vec<WalEntry>,
    /// Byte length of the file up to the end of the last valid line
    valid_len: u64,
    /// An unterminated, unparseable final line follows `valid_len`
    torn_tail: bool,
    /// The last valid line is missing its newline
    unterminated: bool,
}

impl Scan {
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            valid_len: 0,
            torn_tail: false,
            unterminated: false,
        }
    }
}

/// Write-ahead log for durable operation storage
pub struct Wal {
    file: File,
    sequence: u64,
}

impl Wal {
    /// Open or create a WAL at the given path.
    ///
    /// Continues numbering after the last entry already in the file.
    pub fn open(path: &Path) -> Result<Self, WalError> {
        Self::recover(path).map(|(wal, _)| wal)
    }

    /// Open or create a WAL, returning the entries already committed.
    ///
    /// A torn final line left by an interrupted append is truncated away.
    /// Corruption anywhere else fails the open.
    pub fn recover(path: &Path) -> Result<(Self, Vec<WalEntry>), WalError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let scan = scan(path)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if scan.torn_tail {
            tracing::warn!(
                path = %path.display(),
                valid_len = scan.valid_len,
                entries = scan.entries.len(),
                "truncating torn WAL tail"
            );
            file.set_len(scan.valid_len)?;
            file.sync_all()?;
        }
        if scan.unterminated {
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        let sequence = scan.entries.last().map(|e| e.sequence).unwrap_or(0);
        Ok((Self { file, sequence }, scan.entries))
    }

    /// Append an operation and sync it to disk.
    ///
    /// On failure the file is cut back to its length before the write.
    pub fn append(&mut self, op: &Operation) -> Result<u64, WalError> {
        let entry = WalEntry::new(self.sequence + 1, op.clone())?;
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');

        let len = self.file.metadata()?.len();
        let written = self
            .file
            .write_all(&line)
            .and_then(|()| self.file.sync_all());
        if let Err(e) = written {
            if let Err(rollback) = self.file.set_len(len).and_then(|()| self.file.sync_all()) {
                tracing::error!(error = %rollback, len, "failed to roll back WAL append");
            }
            return Err(e.into());
        }

        self.sequence = entry.sequence;
        Ok(self.sequence)
    }

    /// Get the current sequence number
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Read every committed entry in the log, verifying checksums.
    ///
    /// A missing file is an empty log. An unterminated, unparseable final
    /// line is an interrupted append and is ignored; any other unparseable
    /// line or checksum mismatch fails the whole replay.
    pub fn replay(path: &Path) -> Result<Vec<WalEntry>, WalError> {
        scan(path).map(|scan| scan.entries)
    }
}

fn scan(path: &Path) -> Result<Scan, WalError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Scan::empty()),
        Err(e) => return Err(e.into()),
    };

    let mut reader = BufReader::new(file);
    let mut scan = Scan::empty();
    let mut offset = 0u64;
    let mut line = Vec::new();
    let mut line_number = 0u64;

    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line)?;
        if read == 0 {
            break;
        }
        line_number += 1;
        offset += read as u64;
        let terminated = line.last() == Some(&b'\n');

        if line.iter().all(u8::is_ascii_whitespace) {
            scan.valid_len = offset;
            continue;
        }
        let entry: WalEntry = match serde_json::from_slice(&line) {
            Ok(entry) => entry,
            Err(_) if !terminated => {
                scan.torn_tail = true;
                break;
            }
            Err(e) => {
                return Err(WalError::Corrupted {
                    line: line_number,
                    reason: e.to_string(),
                })
            }
        };
        if !entry.verify() {
            return Err(WalError::ChecksumMismatch { line: line_number });
        }
        if let Some(prev) = scan.entries.last() {
            if entry.sequence <= prev.sequence {
                return Err(WalError::Corrupted {
                    line: line_number,
                    reason: format!(
                        "sequence {} does not follow {}",
                        entry.sequence, prev.sequence
                    ),
                });
            }
        }
        scan.entries.push(entry);
        scan.valid_len = offset;
        scan.unterminated = !terminated;
    }

    Ok(scan)
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
