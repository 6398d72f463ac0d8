//! Map raw extracted records onto the canonical ActionItem shape

use crate::types::RawActionItem;
use adjutant_domain::{ActionItem, ExternalId, ItemStatus, Priority, Provenance};
use chrono::NaiveDate;
use tracing::debug;

/// Date shapes the extraction layer is known to emit.
///
/// The instruction contract asks for ISO dates, but models drift; a bad date
/// leaves the field absent rather than failing the record.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

/// The Normalizer turns raw records into canonical action items
///
/// Normalization is idempotent: the same raw record and provenance always
/// yield an identical canonical record, external id included.
#[derive(Debug, Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    /// Create a new Normalizer
    pub fn new() -> Self {
        Self
    }

    /// Normalize one raw record; `None` when the record is dropped (empty
    /// text after trimming).
    pub fn normalize(&self, raw: &RawActionItem, provenance: &Provenance) -> Option<ActionItem> {
        let text = raw.text.as_deref().unwrap_or("").trim().to_string();
        if text.is_empty() {
            debug!("Dropping record with empty text");
            return None;
        }

        let due_date = raw.due_date.as_deref().and_then(parse_due_date);

        let priority = raw
            .priority
            .as_deref()
            .and_then(Priority::parse)
            .unwrap_or_default();

        let status = raw
            .status
            .as_deref()
            .and_then(ItemStatus::parse)
            .unwrap_or_default();

        let owner = raw.owner.as_deref().unwrap_or("").trim().to_string();

        let external_id = ExternalId::derive(provenance, &text);

        Some(ActionItem {
            text,
            owner,
            due_date,
            priority,
            status,
            context: raw.context.clone().filter(|c| !c.trim().is_empty()),
            provenance: provenance.clone(),
            external_id,
        })
    }

    /// Normalize a batch, dropping unusable records
    pub fn normalize_batch(
        &self,
        raw_items: Vec<RawActionItem>,
        provenance: &Provenance,
    ) -> Vec<ActionItem> {
        raw_items
            .iter()
            .filter_map(|raw| self.normalize(raw, provenance))
            .collect()
    }
}

/// Try the known date shapes in order; first hit wins.
fn parse_due_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adjutant_domain::SourceKind;

    fn prov() -> Provenance {
        Provenance::new(SourceKind::CloudDocument).with_doc_id("doc-1")
    }

    fn raw(text: &str) -> RawActionItem {
        RawActionItem {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_trims_text() {
        let normalizer = Normalizer::new();
        let item = normalizer
            .normalize(&raw("  Email Nick about the Q3 review  "), &prov())
            .unwrap();
        assert_eq!(item.text, "Email Nick about the Q3 review");
    }

    #[test]
    fn test_normalize_drops_empty_text() {
        let normalizer = Normalizer::new();
        assert!(normalizer.normalize(&raw("   "), &prov()).is_none());
        assert!(normalizer
            .normalize(&RawActionItem::default(), &prov())
            .is_none());
    }

    #[test]
    fn test_normalize_parses_common_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        for shape in ["2026-03-05", "03/05/2026", "03-05-2026", "March 5, 2026", "Mar 5, 2026", "5 March 2026"] {
            assert_eq!(parse_due_date(shape), Some(expected), "shape {}", shape);
        }
    }

    #[test]
    fn test_normalize_bad_date_leaves_absent() {
        let normalizer = Normalizer::new();
        let mut r = raw("Email Nick");
        r.due_date = Some("sometime next week".to_string());
        let item = normalizer.normalize(&r, &prov()).unwrap();
        assert!(item.due_date.is_none());
    }

    #[test]
    fn test_normalize_priority_vocabulary() {
        let normalizer = Normalizer::new();

        let mut r = raw("Email Nick");
        r.priority = Some("HIGH".to_string());
        assert_eq!(
            normalizer.normalize(&r, &prov()).unwrap().priority,
            Priority::High
        );

        r.priority = Some("critical!!".to_string());
        assert_eq!(
            normalizer.normalize(&r, &prov()).unwrap().priority,
            Priority::Medium
        );

        r.priority = None;
        assert_eq!(
            normalizer.normalize(&r, &prov()).unwrap().priority,
            Priority::Medium
        );
    }

    #[test]
    fn test_normalize_status_defaults_to_todo() {
        let normalizer = Normalizer::new();

        let mut r = raw("Email Nick");
        r.status = Some("shipped?".to_string());
        assert_eq!(
            normalizer.normalize(&r, &prov()).unwrap().status,
            ItemStatus::Todo
        );

        r.status = Some("Completed".to_string());
        assert_eq!(
            normalizer.normalize(&r, &prov()).unwrap().status,
            ItemStatus::Done
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = Normalizer::new();
        let mut r = raw("Email Nick about the Q3 review");
        r.owner = Some("Paola".to_string());
        r.due_date = Some("2026-03-05".to_string());
        r.priority = Some("high".to_string());

        let a = normalizer.normalize(&r, &prov()).unwrap();
        let b = normalizer.normalize(&r, &prov()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.external_id, b.external_id);
    }

    #[test]
    fn test_normalize_batch_drops_unusable() {
        let normalizer = Normalizer::new();
        let items = normalizer.normalize_batch(
            vec![raw("Email Nick"), raw(""), raw("Book the studio")],
            &prov(),
        );
        assert_eq!(items.len(), 2);
    }
}
