// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use crate::engine::{NewItem, StageEngine};
use crate::id::SequentialIdGen;
use yare::parameterized;

fn item_owned_by(owner: &str) -> PipelineItem {
    let engine = StageEngine::new(FakeClock::new(), SequentialIdGen::new("id"));
    let (item, _) = engine
        .create(NewItem::new("org-1", owner), &UserId::from(owner))
        .unwrap()
        .into_parts();
    item
}

#[parameterized(
    admin = { UserRole::Admin, true },
    manager = { UserRole::Manager, true },
    analyst = { UserRole::Analyst, false },
    viewer = { UserRole::Viewer, false },
)]
fn non_owner_access_depends_on_role(role: UserRole, allowed: bool) {
    let item = item_owned_by("owner-1");
    assert_eq!(Actor::new("someone-else", role).can_modify(&item), allowed);
}

#[parameterized(
    analyst = { UserRole::Analyst },
    viewer = { UserRole::Viewer },
)]
fn owner_may_always_modify(role: UserRole) {
    let item = item_owned_by("owner-1");
    assert!(Actor::new("owner-1", role).can_modify(&item));
}

#[test]
fn role_serializes_screaming_snake_case() {
    assert_eq!(serde_json::to_string(&UserRole::Manager).unwrap(), "\"MANAGER\"");
    let role: UserRole = serde_json::from_str("\"VIEWER\"").unwrap();
    assert_eq!(role, UserRole::Viewer);
    assert_eq!(UserRole::Admin.to_string(), "ADMIN");
}
