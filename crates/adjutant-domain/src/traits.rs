//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{ActionItem, ExternalId};

/// Outcome of an upsert into the merge store or the external workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    /// No record with this external id existed; one was inserted
    Created,

    /// An existing record was updated in place
    Updated,
}

/// Trait for the persistent action-item collection
///
/// Implemented by the infrastructure layer (adjutant-store)
pub trait ActionStore {
    /// Error type for store operations
    type Error;

    /// Insert the item, or update the existing record sharing its external
    /// id. All fields follow the incoming record except `status`, which
    /// stays done when the stored record is done and the incoming one says
    /// todo.
    fn upsert(&mut self, item: &ActionItem) -> Result<Upserted, Self::Error>;

    /// Get an item by external id
    fn get(&self, id: &ExternalId) -> Result<Option<ActionItem>, Self::Error>;

    /// Full flat list: due date ascending, dateless items last, ties broken
    /// by insertion order
    fn flatten(&self) -> Result<Vec<ActionItem>, Self::Error>;

    /// Mark an item done; errors when the id is unknown
    fn mark_done(&mut self, id: &ExternalId) -> Result<(), Self::Error>;

    /// Explicitly reopen a done item; errors when the id is unknown
    fn reopen(&mut self, id: &ExternalId) -> Result<(), Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (adjutant-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Kind of entry returned from a folder listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A subfolder
    Folder,

    /// A native document the pipeline can fetch as text
    Document,

    /// Anything else (spreadsheets, images, ...); skipped, not errored
    Other,
}

/// One entry of a folder listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    /// Provider-assigned identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Entry kind
    pub kind: EntryKind,
}

/// Trait for the external document provider
///
/// Implemented by the infrastructure layer (adjutant-sources); the real
/// cloud provider is an external collaborator, so only these two operations
/// are assumed.
pub trait DocumentSource {
    /// Error type for source operations
    type Error;

    /// List the direct children of a folder
    fn list_children(&self, folder_id: &str) -> Result<Vec<FolderEntry>, Self::Error>;

    /// Fetch the rendered plain text of a document
    fn fetch_text(&self, doc_id: &str) -> Result<String, Self::Error>;

    /// Deep link for a document, when the provider has one
    fn doc_link(&self, _doc_id: &str) -> Option<String> {
        None
    }
}

/// Trait for the external collaboration workspace
///
/// Implemented by the infrastructure layer (adjutant-sync). Lookup is by
/// external id so repeated syncs of the same item update one remote row.
pub trait Workspace {
    /// Error type for workspace operations
    type Error;

    /// Find the remote row id holding this external id, if any
    fn find_by_external_id(&self, id: &ExternalId) -> Result<Option<String>, Self::Error>;

    /// Create a remote row for the item, returning its remote id
    fn create(&self, item: &ActionItem) -> Result<String, Self::Error>;

    /// Overwrite the remote row's fields from the item
    fn update(&self, remote_id: &str, item: &ActionItem) -> Result<(), Self::Error>;
}
