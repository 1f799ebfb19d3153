// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn noop_directory_resolves_nothing() {
    let directory = NoOpDirectory::new();

    let user = directory.user_name(&UserId::from("user-1")).await.unwrap();
    let org = directory
        .organization_name(&OrganizationId::from("org-1"))
        .await
        .unwrap();
    let contact = directory
        .contact_name(&ContactId::from("contact-1"))
        .await
        .unwrap();

    assert_eq!(user, None);
    assert_eq!(org, None);
    assert_eq!(contact, None);
}
