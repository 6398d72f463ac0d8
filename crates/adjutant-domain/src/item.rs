//! ActionItem module - the canonical record of Adjutant's merge store

use crate::external_id::ExternalId;
use crate::source::Provenance;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Priority of an action item
///
/// A closed enumeration: extraction output that does not match one of these
/// variants falls back to [`Priority::Medium`] during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait
    Low,

    /// Normal turnaround
    Medium,

    /// Needs attention soon
    High,
}

impl Priority {
    /// Get the priority name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse a priority from a string, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" | "normal" => Some(Priority::Medium),
            "high" | "urgent" => Some(Priority::High),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid priority: {}", s))
    }
}

/// Status of an action item
///
/// The only implicit transition is `todo -> done`. Going back requires an
/// explicit reopen operation on the store; a re-extraction that reports
/// `todo` for an item already marked done does not revert it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Open, not yet completed
    Todo,

    /// Completed
    Done,
}

impl ItemStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Todo => "todo",
            ItemStatus::Done => "done",
        }
    }

    /// Parse a status from a string, case-insensitively
    ///
    /// Accepts the spellings the extraction layer is known to emit.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "todo" | "to do" | "to-do" | "open" | "pending" => Some(ItemStatus::Todo),
            "done" | "complete" | "completed" => Some(ItemStatus::Done),
            _ => None,
        }
    }
}

impl Default for ItemStatus {
    fn default() -> Self {
        ItemStatus::Todo
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid status: {}", s))
    }
}

/// The canonical action-item record
///
/// Produced by the normalizer, persisted by the merge store, and mirrored to
/// the external workspace. Invariant: `text` is non-empty; records that would
/// violate this are dropped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    /// Task description (non-empty)
    pub text: String,

    /// Person responsible; empty when unknown
    #[serde(default)]
    pub owner: String,

    /// Due date, when one could be parsed; absent sorts last
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Priority, defaulting to medium
    #[serde(default)]
    pub priority: Priority,

    /// Completion status
    #[serde(default)]
    pub status: ItemStatus,

    /// One-line summary of where the item came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Source tracking
    pub provenance: Provenance,

    /// Stable identity for dedup and workspace upsert
    pub external_id: ExternalId,
}

impl ActionItem {
    /// Create a new item with the given text and provenance, deriving its
    /// external id from both.
    pub fn new(text: impl Into<String>, provenance: Provenance) -> Self {
        let text = text.into();
        let external_id = ExternalId::derive(&provenance, &text);
        Self {
            text,
            owner: String::new(),
            due_date: None,
            priority: Priority::default(),
            status: ItemStatus::default(),
            context: None,
            provenance,
            external_id,
        }
    }
}
