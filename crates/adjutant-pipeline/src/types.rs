//! Report types produced by pipeline runs

use adjutant_domain::{ActionItem, Provenance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One document (or folder listing) that failed inside a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFailure {
    /// Document identifier, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,

    /// Document name, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_name: Option<String>,

    /// "Category/Leaf" location, when walked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    /// Why the item failed
    pub reason: String,
}

impl ItemFailure {
    /// Build a failure record from a request's provenance
    pub fn from_provenance(provenance: &Provenance, reason: impl Into<String>) -> Self {
        Self {
            doc_id: provenance.doc_id.clone(),
            doc_name: provenance.doc_name.clone(),
            folder: provenance.folder.clone(),
            reason: reason.into(),
        }
    }
}

/// Outcome of merging a batch of extraction requests
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Canonical items merged into the store, in processing order
    pub items: Vec<ActionItem>,

    /// Per-item failures; the batch continued past each of these
    pub failures: Vec<ItemFailure>,

    /// Store records created
    pub created: usize,

    /// Store records updated in place
    pub updated: usize,

    /// Documents whose extraction and merge completed
    pub docs_processed: usize,
}

/// Aggregate statistics of a folder-walk import
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportStats {
    /// Items per "Category/Leaf" folder
    pub items_per_folder: BTreeMap<String, usize>,

    /// Open items in this run
    pub todo_count: usize,

    /// Completed items in this run
    pub done_count: usize,

    /// Documents extracted and merged
    pub docs_processed: usize,

    /// Documents that failed (unreadable or unextractable)
    pub docs_failed: usize,

    /// Non-document files skipped by the content-type filter
    pub files_skipped: usize,

    /// Run identifier
    pub run_id: String,

    /// When the run started (RFC 3339)
    pub started_at: String,
}

/// Snapshot of one folder-walk import
///
/// Persisted wholesale as the "last import", superseding any prior snapshot;
/// a point-in-time view, not an accumulating log. The grouped view is
/// derived from the flat list, never stored separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportResult {
    /// Items grouped by "Category/Leaf" folder path
    pub by_folder: BTreeMap<String, Vec<ActionItem>>,

    /// All items of the run, flat, in processing order
    pub items: Vec<ActionItem>,

    /// Per-item failures reported alongside the successes
    pub failures: Vec<ItemFailure>,

    /// Aggregate counts
    pub stats: ImportStats,
}
