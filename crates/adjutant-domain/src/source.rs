//! Provenance tracking for extracted records

use serde::{Deserialize, Serialize};

/// Kind of source a record was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// An uploaded structured document (sectioned agenda)
    LocalDocument,

    /// Free-form notes pasted or typed in
    NotesText,

    /// A document hosted in the cloud folder hierarchy
    CloudDocument,
}

impl SourceKind {
    /// Get the source kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::LocalDocument => "local-document",
            SourceKind::NotesText => "notes-text",
            SourceKind::CloudDocument => "cloud-document",
        }
    }

    /// Parse a source kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "local-document" => Some(SourceKind::LocalDocument),
            "notes-text" => Some(SourceKind::NotesText),
            "cloud-document" => Some(SourceKind::CloudDocument),
            _ => None,
        }
    }
}

/// Where a record came from
///
/// Attached to every extraction request and carried onto the canonical
/// record. The folder component is a "Category/Leaf" path for walked
/// documents; `doc_id` is the dominant identity key for [`crate::ExternalId`]
/// derivation when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Kind of originating source
    pub kind: SourceKind,

    /// Category/person folder path component, when walked from a hierarchy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    /// Identifier of the originating document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,

    /// Human-readable document name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_name: Option<String>,

    /// Deep link to the originating document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_link: Option<String>,
}

impl Provenance {
    /// Create a provenance with only the source kind set
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            folder: None,
            doc_id: None,
            doc_name: None,
            doc_link: None,
        }
    }

    /// Set the folder path component
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Set the document identifier
    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    /// Set the document name
    pub fn with_doc_name(mut self, doc_name: impl Into<String>) -> Self {
        self.doc_name = Some(doc_name.into());
        self
    }

    /// Set the document deep link
    pub fn with_doc_link(mut self, doc_link: impl Into<String>) -> Self {
        self.doc_link = Some(doc_link.into());
        self
    }
}
