//! Parse LLM output into raw action-item records

use crate::error::ExtractorError;
use crate::types::RawActionItem;
use serde_json::Value;
use tracing::warn;

/// Parse an LLM JSON response into raw action items
///
/// Entries without a usable `text` field are skipped with a warning; the
/// whole response only fails when no JSON array can be located at all.
pub fn parse_llm_response(response: &str) -> Result<Vec<RawActionItem>, ExtractorError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let entries = json
        .as_array()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected JSON array".to_string()))?;

    let mut items = Vec::new();
    for (idx, entry) in entries.iter().enumerate() {
        match serde_json::from_value::<RawActionItem>(entry.clone()) {
            Ok(raw) => {
                if let Err(e) = raw.validate() {
                    warn!("Skipping item {}: {}", idx, e);
                    continue;
                }
                items.push(raw);
            }
            Err(e) => {
                warn!("Failed to parse item {}: {}", idx, e);
            }
        }
    }

    Ok(items)
}

/// Extract JSON from a response, tolerating markdown code fences and
/// surrounding prose.
///
/// Models sometimes wrap the array in ```json fences or lead with a
/// sentence; strip the fences first, then fall back to scanning for the
/// outermost bracket pair.
fn extract_json(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and last line (```)
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        return Ok(json_lines.join("\n"));
    }

    if trimmed.starts_with('[') {
        return Ok(trimmed.to_string());
    }

    // Bracket scan: salvage an array embedded in prose
    match (trimmed.find('['), trimmed.rfind(']')) {
        (Some(start), Some(end)) if end > start => Ok(trimmed[start..=end].to_string()),
        _ => Err(ExtractorError::InvalidFormat(
            "No JSON array found in response".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let response = r#"[
            {
                "text": "Email Nick about the Q3 review",
                "owner": "Paola",
                "due_date": "2026-03-05",
                "priority": "high",
                "status": "todo",
                "context": "Raised in the staff meeting"
            }
        ]"#;

        let items = parse_llm_response(response).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text.as_deref(), Some("Email Nick about the Q3 review"));
        assert_eq!(items[0].owner.as_deref(), Some("Paola"));
        assert_eq!(items[0].priority.as_deref(), Some("high"));
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n[{\"text\": \"Book the studio\"}]\n```";

        let items = parse_llm_response(response).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text.as_deref(), Some("Book the studio"));
    }

    #[test]
    fn test_parse_json_embedded_in_prose() {
        let response = r#"Here are the action items I found:
[{"text": "Book the studio"}]
Let me know if you need anything else."#;

        let items = parse_llm_response(response).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_parse_empty_array() {
        let items = parse_llm_response("[]").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_llm_response("This is not JSON");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_json_not_array() {
        let result = parse_llm_response(r#"{"text": "Book the studio"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_partial_success() {
        let response = r#"[
            {"text": "Book the studio"},
            {"owner": "Paola"},
            {"text": "   "},
            {"text": "Order drafting tables", "priority": "low"}
        ]"#;

        let items = parse_llm_response(response).unwrap();
        // Two valid items; one missing text, one blank text, both skipped
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text.as_deref(), Some("Book the studio"));
        assert_eq!(items[1].text.as_deref(), Some("Order drafting tables"));
    }

    #[test]
    fn test_extract_json_from_plain_array() {
        let json = r#"[{"text": "x"}]"#;
        assert_eq!(extract_json(json).unwrap(), json);
    }

    #[test]
    fn test_extract_json_from_fence_without_language() {
        let response = "```\n[{\"text\": \"x\"}]\n```";
        assert!(extract_json(response).unwrap().contains("\"text\""));
    }
}
