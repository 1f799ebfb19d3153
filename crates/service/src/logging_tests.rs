// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn configured_filter_is_used() {
    let mut config = Config::for_state_dir("/tmp/cst");
    config.log_filter = "cst_service=debug".to_string();
    assert_eq!(env_filter(&config).to_string(), "cst_service=debug");
}

#[test]
fn invalid_filter_falls_back_to_info() {
    let mut config = Config::for_state_dir("/tmp/cst");
    config.log_filter = "cst_service=loud".to_string();
    assert_eq!(env_filter(&config).to_string(), "info");
}

#[test]
fn setup_creates_log_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_state_dir(dir.path().join("state"));

    // A global subscriber may already be installed by another test; the
    // directory is created either way.
    let _ = setup_logging(&config);
    assert!(dir.path().join("state").is_dir());
}
