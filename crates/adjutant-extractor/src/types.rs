//! Request and response types for extraction

use adjutant_domain::Provenance;
use serde::{Deserialize, Serialize};

/// Request to extract action items from text
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Text to extract action items from
    pub text: String,

    /// Where the text came from; carried onto every extracted record
    pub provenance: Provenance,
}

impl ExtractionRequest {
    /// Create a new extraction request
    pub fn new(text: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            text: text.into(),
            provenance,
        }
    }
}

/// A raw record as emitted by the model, before normalization
///
/// Only `text` is required; everything else is best-effort and may arrive in
/// inconsistent vocabularies or date shapes. The normalizer maps this onto
/// the canonical [`adjutant_domain::ActionItem`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawActionItem {
    /// Task description
    #[serde(default)]
    pub text: Option<String>,

    /// Person responsible
    #[serde(default)]
    pub owner: Option<String>,

    /// Owner email, when the source mentions one
    #[serde(default)]
    pub owner_email: Option<String>,

    /// Due date in whatever shape the model produced
    #[serde(default)]
    pub due_date: Option<String>,

    /// Priority word (low/medium/high, or drift)
    #[serde(default)]
    pub priority: Option<String>,

    /// Status word (todo/done, or drift)
    #[serde(default)]
    pub status: Option<String>,

    /// One-sentence summary of where the item came from
    #[serde(default)]
    pub context: Option<String>,
}

impl RawActionItem {
    /// Validate that the record carries a usable text field
    pub fn validate(&self) -> Result<(), String> {
        match &self.text {
            Some(t) if !t.trim().is_empty() => Ok(()),
            Some(_) => Err("text is empty".to_string()),
            None => Err("missing 'text'".to_string()),
        }
    }
}
