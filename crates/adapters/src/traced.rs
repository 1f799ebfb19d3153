// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::directory::{DirectoryAdapter, DirectoryError};
use async_trait::async_trait;
use cst_core::{ContactId, OrganizationId, UserId};
use std::future::Future;
use tracing::Instrument;

/// Wrapper that adds tracing to any DirectoryAdapter
#[derive(Clone)]
pub struct TracedDirectory<D> {
    inner: D,
}

impl<D> TracedDirectory<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

/// Run a lookup, logging misses at debug and failures at warn
async fn lookup<F>(kind: &'static str, id: &str, fut: F) -> Result<Option<String>, DirectoryError>
where
    F: Future<Output = Result<Option<String>, DirectoryError>>,
{
    let span = tracing::debug_span!("directory.lookup", kind, id);
    async move {
        let start = std::time::Instant::now();
        let result = fut.await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(Some(_)) => tracing::trace!(elapsed_ms, "resolved"),
            Ok(None) => tracing::debug!(elapsed_ms, "no display name"),
            Err(e) => tracing::warn!(elapsed_ms, error = %e, "lookup failed"),
        }

        result
    }
    .instrument(span)
    .await
}

#[async_trait]
impl<D: DirectoryAdapter> DirectoryAdapter for TracedDirectory<D> {
    async fn user_name(&self, id: &UserId) -> Result<Option<String>, DirectoryError> {
        lookup("user", id.as_str(), self.inner.user_name(id)).await
    }

    async fn organization_name(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<String>, DirectoryError> {
        lookup("organization", id.as_str(), self.inner.organization_name(id)).await
    }

    async fn contact_name(&self, id: &ContactId) -> Result<Option<String>, DirectoryError> {
        lookup("contact", id.as_str(), self.inner.contact_name(id)).await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
