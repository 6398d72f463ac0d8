//! Adjutant Pipeline
//!
//! Orchestrates the extraction flow end to end:
//!
//! ```text
//! Source Reader → text → Extraction Engine → raw records
//!     → Normalizer → canonical records → Merge Store (→ Workspace Sync)
//! ```
//!
//! Batch operations collect per-item failures and keep going; documents
//! already merged stay merged when a later document fails. Only merge-store
//! transport failures abort a run.
//!
//! The pipeline is a context object constructed per run by the caller; it
//! owns no global state.

#![warn(missing_docs)]

mod error;
mod pipeline;
mod types;

pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use types::{BatchReport, ImportResult, ImportStats, ItemFailure};
