//! Pipeline orchestration

use crate::error::PipelineError;
use crate::types::{BatchReport, ImportResult, ImportStats, ItemFailure};
use adjutant_domain::traits::{ActionStore, DocumentSource, LlmProvider, Upserted, Workspace};
use adjutant_domain::{ActionItem, ExternalId, ItemStatus};
use adjutant_extractor::{ExtractionEngine, ExtractionRequest, Normalizer};
use adjutant_sources::{notes_request, FolderWalker};
use adjutant_store::SqliteStore;
use adjutant_sync::{sync_all, SyncReport};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::{info, warn};
use uuid::Uuid;

/// End-to-end extraction pipeline over one engine and one merge store
///
/// Constructed per run by the caller; drop it when the run is over.
pub struct Pipeline<L>
where
    L: LlmProvider,
{
    engine: ExtractionEngine<L>,
    normalizer: Normalizer,
    store: SqliteStore,
}

impl<L> Pipeline<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a pipeline over the given engine and store
    pub fn new(engine: ExtractionEngine<L>, store: SqliteStore) -> Self {
        Self {
            engine,
            normalizer: Normalizer::new(),
            store,
        }
    }

    /// Extract one document and merge its items
    ///
    /// Single-document path: extraction errors surface directly instead of
    /// degrading to a report entry.
    pub async fn run_document(
        &mut self,
        request: &ExtractionRequest,
    ) -> Result<Vec<ActionItem>, PipelineError> {
        let raw = self.engine.extract(request).await?;
        let items = self.normalizer.normalize_batch(raw, &request.provenance);

        for item in &items {
            self.store.upsert(item)?;
        }
        Ok(items)
    }

    /// Extract free-form notes and merge their items
    pub async fn run_notes(&mut self, text: &str) -> Result<Vec<ActionItem>, PipelineError> {
        let request = notes_request(text);
        self.run_document(&request).await
    }

    /// Process a batch of requests sequentially
    ///
    /// A document whose extraction fails degrades to an empty result and a
    /// failure record; items from earlier documents stay merged. Only store
    /// transport errors abort the batch.
    pub async fn run_batch(
        &mut self,
        requests: &[ExtractionRequest],
    ) -> Result<BatchReport, PipelineError> {
        let mut report = BatchReport::default();

        for request in requests {
            match self.engine.extract(request).await {
                Ok(raw) => {
                    let items = self.normalizer.normalize_batch(raw, &request.provenance);
                    for item in &items {
                        match self.store.upsert(item)? {
                            Upserted::Created => report.created += 1,
                            Upserted::Updated => report.updated += 1,
                        }
                    }
                    report.docs_processed += 1;
                    report.items.extend(items);
                }
                Err(e) => {
                    warn!(
                        "Extraction failed for {:?}: {}",
                        request.provenance.doc_name.as_deref().unwrap_or("(inline)"),
                        e
                    );
                    report
                        .failures
                        .push(ItemFailure::from_provenance(&request.provenance, e.to_string()));
                }
            }
        }

        info!(
            "Batch complete: {} docs, {} items ({} created, {} updated), {} failures",
            report.docs_processed,
            report.items.len(),
            report.created,
            report.updated,
            report.failures.len()
        );
        Ok(report)
    }

    /// Walk a folder hierarchy, merge everything found, and persist the run
    /// as the new last-import snapshot
    ///
    /// `name_contains` restricts the walk to documents whose name contains
    /// the needle (deployments pin agendas to the current year this way).
    /// Failing to list the root folder is fatal; per-document failures are
    /// collected into the result.
    pub async fn import_folder<S>(
        &mut self,
        source: &S,
        root_id: &str,
        name_contains: Option<&str>,
    ) -> Result<ImportResult, PipelineError>
    where
        S: DocumentSource,
        S::Error: std::fmt::Display,
    {
        let started_at = Utc::now().to_rfc3339();
        let run_id = Uuid::now_v7().to_string();

        let mut walker = FolderWalker::new(source);
        if let Some(needle) = name_contains {
            let needle = needle.to_string();
            walker = walker.with_name_filter(move |name| name.contains(&needle));
        }

        let outcome = walker.walk(root_id)?;
        let report = self.run_batch(&outcome.requests).await?;

        let mut failures: Vec<ItemFailure> = outcome
            .failures
            .into_iter()
            .map(|f| ItemFailure {
                doc_id: Some(f.doc_id),
                doc_name: Some(f.doc_name),
                folder: Some(f.folder),
                reason: f.reason,
            })
            .collect();
        failures.extend(report.failures);

        let mut by_folder: BTreeMap<String, Vec<ActionItem>> = BTreeMap::new();
        for item in &report.items {
            let folder = item
                .provenance
                .folder
                .clone()
                .unwrap_or_else(|| "(ungrouped)".to_string());
            by_folder.entry(folder).or_default().push(item.clone());
        }

        let stats = ImportStats {
            items_per_folder: by_folder
                .iter()
                .map(|(folder, items)| (folder.clone(), items.len()))
                .collect(),
            todo_count: report
                .items
                .iter()
                .filter(|i| i.status == ItemStatus::Todo)
                .count(),
            done_count: report
                .items
                .iter()
                .filter(|i| i.status == ItemStatus::Done)
                .count(),
            docs_processed: report.docs_processed,
            docs_failed: failures.len(),
            files_skipped: outcome.skipped_files,
            run_id,
            started_at,
        };

        let result = ImportResult {
            by_folder,
            items: report.items,
            failures,
            stats,
        };

        // The snapshot supersedes any prior import wholesale
        self.store.save_snapshot(&result)?;

        info!(
            "Import complete: {} items across {} folders, {} failures",
            result.items.len(),
            result.by_folder.len(),
            result.failures.len()
        );
        Ok(result)
    }

    /// Full flat list in presentation order
    pub fn flatten(&self) -> Result<Vec<ActionItem>, PipelineError> {
        Ok(self.store.flatten()?)
    }

    /// Mark an item done
    pub fn mark_done(&mut self, id: &ExternalId) -> Result<(), PipelineError> {
        Ok(self.store.mark_done(id)?)
    }

    /// Explicitly reopen a done item
    pub fn reopen(&mut self, id: &ExternalId) -> Result<(), PipelineError> {
        Ok(self.store.reopen(id)?)
    }

    /// Load the last-import snapshot, if any
    pub fn last_import(&self) -> Result<Option<ImportResult>, PipelineError> {
        Ok(self.store.load_snapshot()?)
    }

    /// Mirror the whole store into the external workspace, best-effort
    ///
    /// Workspace failures are reported in the returned summary and never
    /// roll back local state.
    pub fn sync_to_workspace<W>(&self, workspace: &W) -> Result<SyncReport, PipelineError>
    where
        W: Workspace,
        W::Error: std::fmt::Display,
    {
        let items = self.store.flatten()?;
        Ok(sync_all(workspace, &items))
    }
}
