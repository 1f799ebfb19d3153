// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cst_core::{FakeClock, NewItem, SequentialIdGen, StageEngine, UserId};

fn sample_ops() -> Vec<Operation> {
    let engine = StageEngine::new(FakeClock::on(2026, 5, 1), SequentialIdGen::new("id"));
    let user = UserId::from("user-1");
    let created = engine
        .create(NewItem::new("org-1", "user-1"), &user)
        .unwrap();
    let record = created.clone().into_record();
    let advanced = engine.advance(&record, &user, None).unwrap();
    vec![
        Operation::create(created).unwrap(),
        Operation::change(advanced),
    ]
}

#[test]
fn wal_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.wal");
    let ops = sample_ops();

    {
        let mut wal = Wal::open(&path).unwrap();
        for op in &ops {
            wal.append(op).unwrap();
        }
    }

    let entries = Wal::replay(&path).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].sequence, 1);
    assert_eq!(entries[1].sequence, 2);
    assert!(matches!(entries[0].operation, Operation::ItemCreate { .. }));
    assert!(matches!(entries[1].operation, Operation::ItemTransition { .. }));
    assert!(entries.iter().all(WalEntry::verify));
}

#[test]
fn wal_sequence_continues() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.wal");
    let ops = sample_ops();

    {
        let mut wal = Wal::open(&path).unwrap();
        assert_eq!(wal.sequence(), 0);
        wal.append(&ops[0]).unwrap();
        assert_eq!(wal.sequence(), 1);
    }

    {
        let mut wal = Wal::open(&path).unwrap();
        assert_eq!(wal.sequence(), 1);
        assert_eq!(wal.append(&ops[1]).unwrap(), 2);
    }
}

#[test]
fn wal_replay_nonexistent() {
    let path = Path::new("/nonexistent/path/wal");
    let entries = Wal::replay(path).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn wal_open_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/state/pipeline.wal");
    let mut wal = Wal::open(&path).unwrap();
    wal.append(&sample_ops()[0]).unwrap();
    assert!(path.exists());
}

#[test]
fn tampered_entry_fails_checksum() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.wal");
    {
        let mut wal = Wal::open(&path).unwrap();
        for op in &sample_ops() {
            wal.append(op).unwrap();
        }
    }

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
    lines[1] = lines[1].replace("org-1", "org-9");
    std::fs::write(&path, lines.join("\n")).unwrap();

    let err = Wal::replay(&path).unwrap_err();
    assert!(matches!(err, WalError::ChecksumMismatch { line: 2 }), "{err:?}");
}

#[test]
fn corrupted_middle_line_fails_replay() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.wal");
    {
        let mut wal = Wal::open(&path).unwrap();
        for op in &sample_ops() {
            wal.append(op).unwrap();
        }
    }

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
    lines.insert(1, "{\"sequence\":2,\"operat".to_string());
    std::fs::write(&path, lines.join("\n") + "\n").unwrap();

    let err = Wal::replay(&path).unwrap_err();
    assert!(matches!(err, WalError::Corrupted { line: 2, .. }), "{err:?}");
    assert!(Wal::open(&path).is_err());
}

#[test]
fn torn_tail_is_truncated_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.wal");
    let ops = sample_ops();
    {
        let mut wal = Wal::open(&path).unwrap();
        wal.append(&ops[0]).unwrap();
    }
    let committed = std::fs::read_to_string(&path).unwrap();

    let mut contents = committed.clone();
    contents.push_str("{\"sequence\":2,\"operation\":{\"ItemUpd");
    std::fs::write(&path, contents).unwrap();

    // Readers see only the committed entry
    assert_eq!(Wal::replay(&path).unwrap().len(), 1);

    let (mut wal, entries) = Wal::recover(&path).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(wal.sequence(), 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), committed);

    assert_eq!(wal.append(&ops[1]).unwrap(), 2);
    drop(wal);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.ends_with('\n'));
    assert_eq!(contents.lines().count(), 2);
    let entries = Wal::replay(&path).unwrap();
    assert_eq!(
        entries.iter().map(|e| e.sequence).collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[test]
fn unterminated_final_entry_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.wal");
    let ops = sample_ops();
    {
        let mut wal = Wal::open(&path).unwrap();
        wal.append(&ops[0]).unwrap();
    }
    let contents = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, contents.trim_end()).unwrap();

    let mut wal = Wal::open(&path).unwrap();
    assert_eq!(wal.sequence(), 1);
    wal.append(&ops[1]).unwrap();
    drop(wal);

    let entries = Wal::replay(&path).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].sequence, 2);
}

#[test]
fn torn_tail_after_checksum_mismatch_still_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.wal");
    {
        let mut wal = Wal::open(&path).unwrap();
        wal.append(&sample_ops()[0]).unwrap();
    }
    let contents = std::fs::read_to_string(&path).unwrap();
    let tampered = contents.replace("org-1", "org-9") + "{\"sequence\":2";
    std::fs::write(&path, tampered).unwrap();

    let err = Wal::recover(&path).err().unwrap();
    assert!(matches!(err, WalError::ChecksumMismatch { line: 1 }), "{err:?}");
}

#[test]
fn blank_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.wal");
    {
        let mut wal = Wal::open(&path).unwrap();
        wal.append(&sample_ops()[0]).unwrap();
    }
    let mut contents = std::fs::read_to_string(&path).unwrap();
    contents.push_str("\n\n");
    std::fs::write(&path, contents).unwrap();

    assert_eq!(Wal::replay(&path).unwrap().len(), 1);
}
