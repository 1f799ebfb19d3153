// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline service
//!
//! Each call is one transaction: load, check access, apply the engine
//! operation and save against the loaded version. A concurrency conflict
//! reloads and re-applies up to the configured number of retries.

use crate::config::Config;
use crate::error::ServiceError;
use crate::views::{BoardView, ItemDetailView, ItemView, Names};
use cst_adapters::{DirectoryAdapter, FileDirectory, TracedDirectory};
use cst_core::{
    Actor, Board, Clock, IdGen, ItemEdit, ItemId, ItemQuery, NewItem, Page, PipelineRecord,
    StageCommand, StageEngine, SystemClock, UuidIdGen,
};
use cst_storage::{Commit, PipelineStore, WalStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Service collaborators
pub struct ServiceDeps<S, D> {
    pub store: Arc<S>,
    pub directory: D,
}

/// The service as deployed: WAL storage and a file directory
pub type DefaultService =
    PipelineService<WalStore, TracedDirectory<FileDirectory>, SystemClock, UuidIdGen>;

/// Open the WAL store and directory named by `config`
pub async fn open(config: &Config) -> Result<DefaultService, ServiceError> {
    let store = WalStore::open(&config.wal_path())?;
    let directory = match &config.directory_path {
        Some(path) => FileDirectory::load(path).await?,
        None => FileDirectory::default(),
    };
    tracing::info!(
        wal = %config.wal_path().display(),
        directory_names = directory.len(),
        "pipeline service opened"
    );
    Ok(PipelineService::new(
        ServiceDeps {
            store: Arc::new(store),
            directory: TracedDirectory::new(directory),
        },
        SystemClock,
        UuidIdGen,
        config,
    ))
}

/// Transactional front end to the stage engine
pub struct PipelineService<S, D, C: Clock, G: IdGen> {
    store: Arc<S>,
    directory: D,
    engine: StageEngine<C, G>,
    conflict_retries: u32,
    retry_backoff: Duration,
    default_page_size: u32,
}

impl<S, D, C, G> PipelineService<S, D, C, G>
where
    S: PipelineStore,
    D: DirectoryAdapter,
    C: Clock,
    G: IdGen,
{
    pub fn new(deps: ServiceDeps<S, D>, clock: C, ids: G, config: &Config) -> Self {
        Self {
            store: deps.store,
            directory: deps.directory,
            engine: StageEngine::new(clock, ids),
            conflict_retries: config.conflict_retries,
            retry_backoff: config.retry_backoff,
            default_page_size: config.default_page_size,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Add an organization to the pipeline. Any actor may create.
    pub async fn create(&self, actor: &Actor, new: NewItem) -> Result<ItemDetailView, ServiceError> {
        let span = tracing::info_span!(
            "pipeline.create",
            actor = %actor.id,
            organization = %new.organization_id,
        );
        async move {
            let transition = self.engine.create(new, &actor.id)?;
            let record = transition.clone().into_record();
            self.store.save(Commit::create(transition)?)?;
            tracing::info!(
                item = %record.id(),
                stage = record.item().stage().number(),
                "pipeline item created"
            );
            Ok(self.detail_view(&record).await)
        }
        .instrument(span)
        .await
    }

    /// Apply a command to an item on behalf of `actor`
    pub async fn execute(
        &self,
        actor: &Actor,
        id: &ItemId,
        command: StageCommand,
    ) -> Result<ItemDetailView, ServiceError> {
        let span = tracing::info_span!(
            "pipeline.execute",
            item = %id,
            command = command.name(),
            actor = %actor.id,
        );
        async move {
            let record = self.commit_with_retry(actor, id, &command).await?;
            Ok(self.detail_view(&record).await)
        }
        .instrument(span)
        .await
    }

    async fn commit_with_retry(
        &self,
        actor: &Actor,
        id: &ItemId,
        command: &StageCommand,
    ) -> Result<PipelineRecord, ServiceError> {
        let mut attempt = 0;
        loop {
            let snapshot = self.store.load(id)?;
            if !actor.can_modify(snapshot.record.item()) {
                tracing::warn!(role = %actor.role, "modification forbidden");
                return Err(ServiceError::Forbidden {
                    actor: actor.id.clone(),
                    item: id.clone(),
                });
            }

            let transition =
                match self
                    .engine
                    .execute(&snapshot.record, &actor.id, command.clone())
                {
                    Ok(transition) => transition,
                    Err(e) => {
                        tracing::info!(error = %e, "command rejected");
                        return Err(e.into());
                    }
                };

            if transition.entry().is_none() && transition.item() == snapshot.record.item() {
                tracing::debug!("edit changes nothing, not committed");
                return Ok(snapshot.record);
            }

            let mut record = snapshot.record.clone();
            match self.store.save(Commit::change(&snapshot, transition.clone())) {
                Ok(version) => {
                    record.apply(transition);
                    tracing::info!(
                        version,
                        stage = record.item().stage().number(),
                        status = %record.item().status(),
                        "command applied"
                    );
                    return Ok(record);
                }
                Err(e) if e.is_conflict() && attempt < self.conflict_retries => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %e, "concurrent modification, retrying");
                    tokio::time::sleep(self.retry_backoff).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub async fn advance(
        &self,
        actor: &Actor,
        id: &ItemId,
        note: Option<String>,
    ) -> Result<ItemDetailView, ServiceError> {
        self.execute(actor, id, StageCommand::Advance { note }).await
    }

    pub async fn revert(
        &self,
        actor: &Actor,
        id: &ItemId,
        note: impl Into<String>,
    ) -> Result<ItemDetailView, ServiceError> {
        let note = note.into();
        self.execute(actor, id, StageCommand::Revert { note }).await
    }

    pub async fn shelve(
        &self,
        actor: &Actor,
        id: &ItemId,
        reason: impl Into<String>,
    ) -> Result<ItemDetailView, ServiceError> {
        let reason = reason.into();
        self.execute(actor, id, StageCommand::Shelve { reason }).await
    }

    pub async fn pass(
        &self,
        actor: &Actor,
        id: &ItemId,
        reason: impl Into<String>,
    ) -> Result<ItemDetailView, ServiceError> {
        let reason = reason.into();
        self.execute(actor, id, StageCommand::Pass { reason }).await
    }

    pub async fn reactivate(
        &self,
        actor: &Actor,
        id: &ItemId,
        note: impl Into<String>,
        target_stage: Option<i64>,
    ) -> Result<ItemDetailView, ServiceError> {
        let note = note.into();
        self.execute(actor, id, StageCommand::Reactivate { note, target_stage })
            .await
    }

    pub async fn convert(&self, actor: &Actor, id: &ItemId) -> Result<ItemDetailView, ServiceError> {
        self.execute(actor, id, StageCommand::Convert).await
    }

    pub async fn edit(
        &self,
        actor: &Actor,
        id: &ItemId,
        edit: ItemEdit,
    ) -> Result<ItemDetailView, ServiceError> {
        self.execute(actor, id, StageCommand::Edit { edit }).await
    }

    /// Soft-delete an item; the returned view is its final state
    pub async fn remove(&self, actor: &Actor, id: &ItemId) -> Result<ItemDetailView, ServiceError> {
        self.execute(actor, id, StageCommand::Remove).await
    }

    /// An item with its full history
    pub async fn detail(&self, id: &ItemId) -> Result<ItemDetailView, ServiceError> {
        let snapshot = self.store.load(id)?;
        Ok(self.detail_view(&snapshot.record).await)
    }

    /// One page of items matching `query`
    pub async fn list(&self, query: ItemQuery) -> Result<Page<ItemView>, ServiceError> {
        let items = self.store.list_all()?;
        let page = query.run(&items)?;
        let now = self.engine.clock().now();
        let mut names = Names::new(&self.directory);
        let mut views = Vec::with_capacity(page.items.len());
        for item in &page.items {
            views.push(ItemView::build(item, now, &mut names).await);
        }
        Ok(Page {
            items: views,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
        })
    }

    /// Query with defaults taken from the service configuration
    pub fn default_query(&self) -> ItemQuery {
        ItemQuery::new().page(1, self.default_page_size)
    }

    /// The kanban board over all live items
    pub async fn board(&self) -> Result<BoardView, ServiceError> {
        let items = self.store.list_all()?;
        let now = self.engine.clock().now();
        let board = Board::build(&items, now);
        tracing::debug!(
            active = board.summary.total_active,
            back_burner = board.summary.total_back_burner,
            "board built"
        );
        let mut names = Names::new(&self.directory);
        Ok(BoardView::build(&board, now, &mut names).await)
    }

    async fn detail_view(&self, record: &PipelineRecord) -> ItemDetailView {
        let mut names = Names::new(&self.directory);
        ItemDetailView::build(record, self.engine.clock().now(), &mut names).await
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
