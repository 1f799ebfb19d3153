// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::directory::FakeDirectory;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

#[tokio::test]
async fn traced_directory_passes_results_through() {
    let fake = FakeDirectory::new().with_organization("org-1", "Acme Robotics");
    let traced = TracedDirectory::new(fake.clone());

    let name = traced
        .organization_name(&OrganizationId::from("org-1"))
        .await
        .unwrap();
    assert_eq!(name.as_deref(), Some("Acme Robotics"));
    assert_eq!(fake.calls().len(), 1);
}

#[test]
fn traced_directory_logs_misses() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedDirectory::new(FakeDirectory::new());
        traced.user_name(&UserId::from("user-404")).await
    });

    assert_eq!(result.unwrap(), None);
    assert!(
        logs.contains("directory.lookup"),
        "Should log span name. Logs:\n{}",
        logs
    );
    assert!(logs.contains("user-404"), "Should log id. Logs:\n{}", logs);
    assert!(
        logs.contains("no display name"),
        "Should log miss. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_directory_logs_failures() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeDirectory::new();
        fake.set_unavailable(true);
        let traced = TracedDirectory::new(fake);
        traced.contact_name(&ContactId::from("contact-1")).await
    });

    assert!(result.is_err());
    assert!(
        logs.contains("lookup failed"),
        "Should log failure. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("elapsed_ms"),
        "Should log timing. Logs:\n{}",
        logs
    );
}
