// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end tests against the WAL-backed service

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use cst_core::{Actor, ItemId, NewItem, PipelineStatus, Stage, UserRole};
use cst_service::{open, Config};
use std::path::Path;

const DIRECTORY: &str = r#"
[users]
dana = "Dana Whitfield"

[organizations]
org-acme = "Acme Robotics"
"#;

fn config(state_dir: &Path) -> Config {
    let directory_path = state_dir.join("directory.toml");
    std::fs::create_dir_all(state_dir).unwrap();
    std::fs::write(&directory_path, DIRECTORY).unwrap();
    let mut config = Config::for_state_dir(state_dir);
    config.directory_path = Some(directory_path);
    config
}

fn dana() -> Actor {
    Actor::new("dana", UserRole::Analyst)
}

#[tokio::test]
async fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());

    let id: ItemId = {
        let service = open(&config).await.unwrap();
        let created = service
            .create(&dana(), NewItem::new("org-acme", "dana").at_stage(4))
            .await
            .unwrap();
        let id = created.item.item.id().clone();
        service
            .pass(&dana(), &id, "lost to competitor")
            .await
            .unwrap();
        id
    };

    let service = open(&config).await.unwrap();
    let detail = service.detail(&id).await.unwrap();
    assert_eq!(detail.item.item.status(), PipelineStatus::Passed);
    assert_eq!(detail.item.item.passed_reason(), Some("lost to competitor"));
    assert_eq!(detail.item.organization_name.as_deref(), Some("Acme Robotics"));
    assert_eq!(detail.history.len(), 2);

    let reopened = service.reactivate(&dana(), &id, "reopened", None).await.unwrap();
    assert_eq!(reopened.item.item.stage(), Stage::LiveDiligence);
    assert_eq!(reopened.item.item.status(), PipelineStatus::Active);
    assert!(config.wal_path().exists());
}

#[tokio::test]
async fn views_serialize_for_presentation() {
    let dir = tempfile::tempdir().unwrap();
    let service = open(&config(dir.path())).await.unwrap();
    let created = service
        .create(&dana(), NewItem::new("org-acme", "dana"))
        .await
        .unwrap();
    service
        .shelve(&dana(), created.item.item.id(), "waiting on Q3 financials")
        .await
        .unwrap();

    let board = serde_json::to_value(service.board().await.unwrap()).unwrap();
    let card = &board["back_burner"][0];
    assert_eq!(card["status"], "BACK_BURNER");
    assert_eq!(card["back_burner_reason"], "waiting on Q3 financials");
    assert_eq!(card["organization_name"], "Acme Robotics");
    assert_eq!(card["stage_when_shelved_label"], "First Meeting");
    assert_eq!(board["summary"]["total_back_burner"], 1);
    assert_eq!(board["stages"].as_array().unwrap().len(), 6);

    let detail = serde_json::to_value(service.detail(created.item.item.id()).await.unwrap()).unwrap();
    assert_eq!(detail["history"][0]["to_status"], "BACK_BURNER");
    assert_eq!(detail["history"][0]["changed_by_name"], "Dana Whitfield");
    assert_eq!(detail["history"][1]["to_stage_label"], "First Meeting");
}

#[tokio::test]
async fn missing_directory_file_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::for_state_dir(dir.path());
    config.directory_path = Some(dir.path().join("missing.toml"));

    let result = open(&config).await;
    assert!(matches!(result, Err(cst_service::ServiceError::Directory(_))));
}
