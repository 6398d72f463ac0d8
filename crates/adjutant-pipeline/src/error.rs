//! Error types for pipeline runs

use thiserror::Error;

/// Errors that abort a pipeline run
///
/// Per-item failures inside batches are collected into reports instead;
/// these variants cover single-document runs and the fatal cases (root
/// listing, merge-store transport).
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Merge store could not be read or written
    #[error("Store error: {0}")]
    Store(#[from] adjutant_store::StoreError),

    /// Source failure on a non-batch path (root listing, single document)
    #[error("Source error: {0}")]
    Source(#[from] adjutant_sources::SourceError),

    /// Extraction failure on a single-document run
    #[error("Extraction error: {0}")]
    Extraction(#[from] adjutant_extractor::ExtractorError),
}
