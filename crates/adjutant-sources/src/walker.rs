//! Two-level folder hierarchy walker
//!
//! Structure: root → category folders ("Staff Meetings", "Projects") →
//! person/project folders → documents. Depth is fixed, so the walk is two
//! explicit loops, not recursion. Documents sitting directly inside a
//! category folder are grouped under the leaf name "This folder".

use crate::SourceError;
use adjutant_domain::traits::{DocumentSource, EntryKind, FolderEntry};
use adjutant_domain::{Provenance, SourceKind};
use adjutant_extractor::ExtractionRequest;
use tracing::{debug, info, warn};

/// Leaf label for documents directly under a category folder
pub const DIRECT_DOCS_LABEL: &str = "This folder";

/// A per-document failure collected during a walk
///
/// Walks never abort on these; the batch continues and the caller reports
/// them alongside successful results.
#[derive(Debug, Clone)]
pub struct WalkFailure {
    /// Identifier of the document or folder that failed
    pub doc_id: String,

    /// Display name
    pub doc_name: String,

    /// "Category/Leaf" location
    pub folder: String,

    /// Why the item was not read
    pub reason: String,
}

/// Result of walking a folder hierarchy
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// One request per qualifying document, provenance attached
    pub requests: Vec<ExtractionRequest>,

    /// Per-item failures (fetch errors, unreadable listings)
    pub failures: Vec<WalkFailure>,

    /// Non-document files seen and skipped by the content-type filter
    pub skipped_files: usize,

    /// Category folders visited
    pub categories_walked: usize,
}

/// Walks a two-level folder hierarchy through a `DocumentSource`
pub struct FolderWalker<'a, S> {
    source: &'a S,
    name_filter: Option<Box<dyn Fn(&str) -> bool + 'a>>,
}

impl<'a, S> FolderWalker<'a, S>
where
    S: DocumentSource,
    S::Error: std::fmt::Display,
{
    /// Create a walker over the given source
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            name_filter: None,
        }
    }

    /// Restrict the walk to documents whose name passes the predicate
    /// (deployments filter agendas to the current year this way)
    pub fn with_name_filter(mut self, filter: impl Fn(&str) -> bool + 'a) -> Self {
        self.name_filter = Some(Box::new(filter));
        self
    }

    /// Walk the hierarchy under `root_id`
    ///
    /// Failing to list the root is fatal; everything below that is collected
    /// per item and the walk continues.
    pub fn walk(&self, root_id: &str) -> Result<WalkOutcome, SourceError> {
        let children = self
            .source
            .list_children(root_id)
            .map_err(|e| SourceError::Unavailable(format!("listing root folder: {}", e)))?;

        let mut outcome = WalkOutcome::default();

        let categories: Vec<&FolderEntry> = children
            .iter()
            .filter(|c| c.kind == EntryKind::Folder && !is_archived_folder(&c.name))
            .collect();
        info!("Root: {} category folders (archived excluded)", categories.len());

        for category in categories {
            outcome.categories_walked += 1;
            debug!("Category: {}", category.name);

            let category_children = match self.source.list_children(&category.id) {
                Ok(c) => c,
                Err(e) => {
                    warn!("Could not list category '{}': {}", category.name, e);
                    outcome.failures.push(WalkFailure {
                        doc_id: category.id.clone(),
                        doc_name: category.name.clone(),
                        folder: category.name.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            // Documents directly in the category folder
            let direct_label = format!("{}/{}", category.name, DIRECT_DOCS_LABEL);
            self.collect_documents(&category_children, &direct_label, &mut outcome);

            // Person/project subfolders
            for leaf in category_children
                .iter()
                .filter(|c| c.kind == EntryKind::Folder && !is_archived_folder(&c.name))
            {
                let label = format!("{}/{}", category.name, leaf.name);
                debug!("Leaf folder: {}", label);

                match self.source.list_children(&leaf.id) {
                    Ok(docs) => self.collect_documents(&docs, &label, &mut outcome),
                    Err(e) => {
                        warn!("Could not list folder '{}': {}", label, e);
                        outcome.failures.push(WalkFailure {
                            doc_id: leaf.id.clone(),
                            doc_name: leaf.name.clone(),
                            folder: label,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            "Walk complete: {} requests, {} failures, {} skipped files",
            outcome.requests.len(),
            outcome.failures.len(),
            outcome.skipped_files
        );
        Ok(outcome)
    }

    fn collect_documents(&self, entries: &[FolderEntry], label: &str, outcome: &mut WalkOutcome) {
        for entry in entries {
            match entry.kind {
                EntryKind::Folder => {} // handled by the caller at its own level
                EntryKind::Other => outcome.skipped_files += 1,
                EntryKind::Document => {
                    if let Some(filter) = &self.name_filter {
                        if !filter(&entry.name) {
                            continue;
                        }
                    }
                    match self.source.fetch_text(&entry.id) {
                        Ok(text) => {
                            let mut provenance = Provenance::new(SourceKind::CloudDocument)
                                .with_folder(label)
                                .with_doc_id(&entry.id)
                                .with_doc_name(&entry.name);
                            if let Some(link) = self.source.doc_link(&entry.id) {
                                provenance = provenance.with_doc_link(link);
                            }
                            outcome.requests.push(ExtractionRequest::new(text, provenance));
                        }
                        Err(e) => {
                            warn!("Could not read '{}' in {}: {}", entry.name, label, e);
                            outcome.failures.push(WalkFailure {
                                doc_id: entry.id.clone(),
                                doc_name: entry.name.clone(),
                                folder: label.to_string(),
                                reason: e.to_string(),
                            });
                        }
                    }
                }
            }
        }
    }
}

/// Skip **Archive / *Archive folders.
///
/// Only starred spellings mark an archive; a folder that merely mentions the
/// word ("Archive Photography Review") is walked normally.
fn is_archived_folder(name: &str) -> bool {
    let n = name.trim().to_lowercase();
    if !n.contains("archive") {
        return false;
    }
    n.starts_with("**") || n.contains("**archive") || n.starts_with('*')
}
