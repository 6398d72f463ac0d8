//! Adjutant Source Readers
//!
//! Turns source descriptors into `(text, provenance)` extraction requests.
//!
//! # Readers
//!
//! - [`agenda`]: local structured documents; DONE/TODO section markers become
//!   per-line status tags the extraction prompt understands
//! - [`walker`]: two-level folder hierarchies (category → person/project →
//!   documents) walked through the `DocumentSource` trait
//! - [`fs`]: a filesystem-backed `DocumentSource`, so the walker runs against
//!   a local directory tree without any cloud provider
//!
//! A reader failure is per-item (`SourceError::Unavailable`); batch callers
//! collect these and continue.

#![warn(missing_docs)]

pub mod agenda;
pub mod fs;
pub mod walker;

use adjutant_domain::{Provenance, SourceKind};
use adjutant_extractor::ExtractionRequest;
use thiserror::Error;

pub use fs::FsSource;
pub use walker::{FolderWalker, WalkFailure, WalkOutcome};

/// Errors that can occur while reading sources
#[derive(Error, Debug)]
pub enum SourceError {
    /// Content could not be fetched or parsed; recoverable per item
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// I/O error from a local source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wrap free-form notes into a single extraction request
pub fn notes_request(text: impl Into<String>) -> ExtractionRequest {
    ExtractionRequest::new(text, Provenance::new(SourceKind::NotesText))
}
