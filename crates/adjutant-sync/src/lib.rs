//! Adjutant Workspace Sync
//!
//! Best-effort mirroring of canonical action items into an external
//! collaboration workspace database, keyed by external id so repeated runs
//! update rows instead of duplicating them.
//!
//! Local persistence is the source of truth: a workspace failure is reported
//! and never rolls back an already-completed merge-store update.
//!
//! # Implementations
//!
//! - [`NotionWorkspace`]: the Notion HTTP API (query by External ID property,
//!   create page, patch page)
//! - [`MockWorkspace`]: in-memory, with call counts, for tests

#![warn(missing_docs)]

pub mod notion;

use adjutant_domain::traits::{Upserted, Workspace};
use adjutant_domain::{ActionItem, ExternalId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, warn};

pub use notion::NotionWorkspace;

/// Errors that can occur during workspace sync
#[derive(Error, Debug)]
pub enum SyncError {
    /// Workspace API error
    #[error("Workspace error: {0}")]
    Workspace(String),

    /// Missing credentials or database id
    #[error("Workspace not configured: {0}")]
    NotConfigured(String),
}

/// One item that failed to reach the workspace
#[derive(Debug, Clone)]
pub struct SyncFailure {
    /// External id of the failing item
    pub external_id: ExternalId,

    /// Task text, for reporting
    pub text: String,

    /// Why the upsert failed
    pub reason: String,
}

/// Outcome of syncing a batch of items
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Remote rows created
    pub created: usize,

    /// Remote rows updated in place
    pub updated: usize,

    /// Items that could not be synced; local state is unaffected
    pub failures: Vec<SyncFailure>,
}

/// Upsert one item into the workspace
///
/// Safe to call repeatedly with the same item: lookup by external id means a
/// second call updates the existing remote row.
pub fn sync_item<W>(workspace: &W, item: &ActionItem) -> Result<Upserted, SyncError>
where
    W: Workspace,
    W::Error: std::fmt::Display,
{
    let existing = workspace
        .find_by_external_id(&item.external_id)
        .map_err(|e| SyncError::Workspace(e.to_string()))?;

    match existing {
        Some(remote_id) => {
            workspace
                .update(&remote_id, item)
                .map_err(|e| SyncError::Workspace(e.to_string()))?;
            Ok(Upserted::Updated)
        }
        None => {
            workspace
                .create(item)
                .map_err(|e| SyncError::Workspace(e.to_string()))?;
            Ok(Upserted::Created)
        }
    }
}

/// Upsert a batch, collecting per-item failures
///
/// Failures never abort the batch and never touch local state.
pub fn sync_all<W>(workspace: &W, items: &[ActionItem]) -> SyncReport
where
    W: Workspace,
    W::Error: std::fmt::Display,
{
    let mut report = SyncReport::default();

    for item in items {
        match sync_item(workspace, item) {
            Ok(Upserted::Created) => report.created += 1,
            Ok(Upserted::Updated) => report.updated += 1,
            Err(e) => {
                warn!("Workspace sync failed for '{}': {}", item.text, e);
                report.failures.push(SyncFailure {
                    external_id: item.external_id.clone(),
                    text: item.text.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "Workspace sync: {} created, {} updated, {} failed",
        report.created,
        report.updated,
        report.failures.len()
    );
    report
}

/// In-memory workspace for deterministic testing
///
/// Remote rows live in a map keyed by external id; `fail_all` simulates an
/// unreachable workspace.
#[derive(Debug, Clone, Default)]
pub struct MockWorkspace {
    rows: Arc<Mutex<HashMap<String, (String, ActionItem)>>>,
    next_id: Arc<Mutex<usize>>,
    fail_all: Arc<Mutex<bool>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockWorkspace {
    /// Create an empty mock workspace
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail
    pub fn set_unreachable(&self, unreachable: bool) {
        *self.fail_all.lock().unwrap() = unreachable;
    }

    /// Number of remote rows
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Get a remote row by external id
    pub fn row(&self, id: &ExternalId) -> Option<ActionItem> {
        self.rows
            .lock()
            .unwrap()
            .get(id.as_str())
            .map(|(_, item)| item.clone())
    }

    /// Number of API calls made
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn check(&self) -> Result<(), String> {
        *self.call_count.lock().unwrap() += 1;
        if *self.fail_all.lock().unwrap() {
            return Err("workspace unreachable".to_string());
        }
        Ok(())
    }
}

impl Workspace for MockWorkspace {
    type Error = String;

    fn find_by_external_id(&self, id: &ExternalId) -> Result<Option<String>, Self::Error> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(id.as_str())
            .map(|(remote_id, _)| remote_id.clone()))
    }

    fn create(&self, item: &ActionItem) -> Result<String, Self::Error> {
        self.check()?;
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let remote_id = format!("page-{}", *next);
        self.rows.lock().unwrap().insert(
            item.external_id.as_str().to_string(),
            (remote_id.clone(), item.clone()),
        );
        Ok(remote_id)
    }

    fn update(&self, remote_id: &str, item: &ActionItem) -> Result<(), Self::Error> {
        self.check()?;
        self.rows.lock().unwrap().insert(
            item.external_id.as_str().to_string(),
            (remote_id.to_string(), item.clone()),
        );
        Ok(())
    }
}
