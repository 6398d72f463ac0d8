//! Adjutant Extractor
//!
//! Converts unstructured meeting text to structured action items using an LLM.
//!
//! # Architecture
//!
//! ```text
//! Text → ExtractionEngine → LLM → RawActionItems → Normalizer → ActionItems
//! ```
//!
//! # Key Features
//!
//! - **Text-to-Items Conversion**: accept text blocks and produce structured
//!   action-item records
//! - **Empty-Input Short-Circuit**: blank input never reaches the model
//! - **Parse Retry**: one transparent retry with a stricter reformatting
//!   instruction when the model response is not parseable
//! - **Normalization**: heterogeneous raw records mapped onto the canonical
//!   shape with provenance and a stable external id
//!
//! # Example Usage
//!
//! ```no_run
//! use adjutant_extractor::{EngineConfig, ExtractionEngine, ExtractionRequest, Normalizer};
//! use adjutant_domain::{Provenance, SourceKind};
//! use adjutant_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new("[]");
//! let engine = ExtractionEngine::new(llm, EngineConfig::default());
//! let normalizer = Normalizer::new();
//!
//! let request = ExtractionRequest::new(
//!     "0001 [TODO] Email Nick about the Q3 review",
//!     Provenance::new(SourceKind::NotesText),
//! );
//!
//! let raw = engine.extract(&request).await?;
//! let items = normalizer.normalize_batch(raw, &request.provenance);
//! println!("Extracted {} items", items.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod normalize;
mod parser;
mod prompt;
mod types;

#[cfg(test)]
mod tests;

pub use config::EngineConfig;
pub use engine::ExtractionEngine;
pub use error::ExtractorError;
pub use normalize::Normalizer;
pub use prompt::PromptBuilder;
pub use types::{ExtractionRequest, RawActionItem};
