//! Stable external identifiers for dedup and workspace upsert

use crate::source::Provenance;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of leading normalized tokens hashed into the content fingerprint.
///
/// Keeping the fingerprint to the leading tokens means model phrasing drift
/// in trailing detail words maps to the same id when the identity key
/// matches, while distinct tasks diverge on their opening words.
const FINGERPRINT_TOKENS: usize = 8;

/// Stable identity of an action item across repeated extraction runs
///
/// Derived from the source identity (document id when present, else folder,
/// else a hash of the full text) combined with a fingerprint of the
/// normalized text. Identical re-extractions collide, so the merge store and
/// the external workspace can upsert instead of appending duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalId(String);

impl ExternalId {
    /// Derive the external id for a record from its provenance and text
    pub fn derive(provenance: &Provenance, text: &str) -> Self {
        let tokens = normalize_tokens(text);

        let identity: String = if let Some(doc_id) = &provenance.doc_id {
            doc_id.clone()
        } else if let Some(folder) = &provenance.folder {
            folder.clone()
        } else {
            sha256_hex(tokens.join(" ").as_bytes())
        };

        let stem: Vec<&str> = tokens
            .iter()
            .take(FINGERPRINT_TOKENS)
            .map(String::as_str)
            .collect();
        let fingerprint = sha256_hex(stem.join(" ").as_bytes());

        let base = format!("{}::{}", identity, fingerprint);
        Self(sha256_hex(base.as_bytes()))
    }

    /// Wrap an already-derived id (storage layer deserialization)
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercase, strip punctuation, collapse whitespace.
fn normalize_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::source::SourceKind;
    use proptest::prelude::*;

    proptest! {
        /// Property: derivation is deterministic
        #[test]
        fn test_derive_deterministic(doc_id in "[a-z0-9]{1,12}", text in ".{0,200}") {
            let prov = Provenance::new(SourceKind::CloudDocument).with_doc_id(doc_id);
            let a = ExternalId::derive(&prov, &text);
            let b = ExternalId::derive(&prov, &text);
            prop_assert_eq!(a, b);
        }

        /// Property: the id is always 64 hex characters regardless of input
        #[test]
        fn test_derive_shape(text in ".{0,200}") {
            let prov = Provenance::new(SourceKind::NotesText);
            let id = ExternalId::derive(&prov, &text);
            prop_assert_eq!(id.as_str().len(), 64);
            prop_assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        }

        /// Property: whitespace shape never changes the id
        #[test]
        fn test_whitespace_insensitive(words in proptest::collection::vec("[a-zA-Z]{1,8}", 1..10)) {
            let prov = Provenance::new(SourceKind::NotesText);
            let single = words.join(" ");
            let double = words.join("  ");
            prop_assert_eq!(
                ExternalId::derive(&prov, &single),
                ExternalId::derive(&prov, &double)
            );
        }
    }
}
