//! LLM prompt construction for action-item extraction

/// Builds prompts for the LLM to extract action items
pub struct PromptBuilder {
    text: String,
    strict: bool,
}

impl PromptBuilder {
    /// Create a new prompt builder for the given meeting text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strict: false,
        }
    }

    /// Append the stricter reformatting instruction used on the retry after
    /// an unparseable response.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Meeting notes:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.text);
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        if self.strict {
            prompt.push_str("\n\n");
            prompt.push_str(STRICT_REFORMAT_REMINDER);
        }

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are a JSON-only extractor. Extract action items from the meeting notes below.

Lines may begin with a status hint tag:
- If tagged [DONE], the extracted action item MUST have "status": "done"
- If tagged [TODO], the extracted action item MUST have "status": "todo" unless the text clearly indicates it is already completed.
- Untagged text carries no hint; infer status from the wording, defaulting to "todo".

Each action item is an object:

{
  "text": "short description (required)",
  "owner": "Full Name or null",
  "owner_email": "email or null",
  "due_date": "YYYY-MM-DD or null",
  "priority": "low|medium|high",
  "status": "todo|done",
  "context": "one sentence summary of where it came from"
}

Rules:
- One task per item; do not merge unrelated tasks
- Keep "text" short and imperative
- Only emit a due_date the notes actually support
- If there are no action items, return []"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON array only, no additional text):
[
  {
    "text": "short description",
    "owner": "Full Name or null",
    "owner_email": "email or null",
    "due_date": "YYYY-MM-DD or null",
    "priority": "low|medium|high",
    "status": "todo|done",
    "context": "one sentence"
  }
]

Remember: Return ONLY a valid JSON array, no markdown code blocks, no explanations."#;

const STRICT_REFORMAT_REMINDER: &str = r#"IMPORTANT: Your previous reply could not be parsed. Respond with NOTHING but a single JSON array. The first character of your reply must be '[' and the last character must be ']'. No prose, no code fences, no trailing commentary."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text() {
        let prompt = PromptBuilder::new("0001 [TODO] Email Nick about the Q3 review").build();
        assert!(prompt.contains("Email Nick about the Q3 review"));
        assert!(prompt.contains("Meeting notes:"));
    }

    #[test]
    fn test_prompt_includes_instructions() {
        let prompt = PromptBuilder::new("Some text").build();
        assert!(prompt.contains("JSON-only extractor"));
        assert!(prompt.contains("\"status\": \"done\""));
        assert!(prompt.contains("due_date"));
    }

    #[test]
    fn test_default_prompt_is_not_strict() {
        let prompt = PromptBuilder::new("Some text").build();
        assert!(!prompt.contains("could not be parsed"));
    }

    #[test]
    fn test_strict_prompt_appends_reformat_instruction() {
        let prompt = PromptBuilder::new("Some text").strict().build();
        assert!(prompt.contains("could not be parsed"));
        assert!(prompt.contains("first character of your reply must be '['"));
    }
}
