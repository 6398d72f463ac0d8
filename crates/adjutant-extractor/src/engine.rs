//! Core Extraction Engine implementation

use crate::config::EngineConfig;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::PromptBuilder;
use crate::types::{ExtractionRequest, RawActionItem};
use adjutant_domain::traits::LlmProvider;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Extraction Engine converts unstructured text into raw action items
///
/// Owns the retry behavior: an unparseable model response triggers exactly
/// one retry with a stricter reformatting instruction; a successful retry is
/// transparent to the caller.
pub struct ExtractionEngine<L>
where
    L: LlmProvider,
{
    provider: Arc<L>,
    config: EngineConfig,
}

impl<L> ExtractionEngine<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new engine over the given provider
    pub fn new(provider: L, config: EngineConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
        }
    }

    /// Extract raw action items from the request text
    ///
    /// Empty or whitespace-only input short-circuits to an empty result
    /// without invoking the model.
    pub async fn extract(
        &self,
        request: &ExtractionRequest,
    ) -> Result<Vec<RawActionItem>, ExtractorError> {
        if request.text.trim().is_empty() {
            debug!("Empty input, skipping model call");
            return Ok(Vec::new());
        }

        if request.text.len() > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(
                request.text.len(),
                self.config.max_text_length,
            ));
        }

        info!(
            "Starting extraction, source {:?}, text length {}",
            request.provenance.doc_name.as_deref().unwrap_or("(inline)"),
            request.text.len()
        );

        let prompt = PromptBuilder::new(&request.text).build();
        let response = self.call_llm_with_timeout(prompt).await?;

        debug!("LLM response length: {} chars", response.len());

        match parse_llm_response(&response) {
            Ok(items) => {
                info!("Parsed {} raw action items", items.len());
                Ok(items)
            }
            Err(first_err) => {
                warn!("Unparseable response ({}), retrying with strict prompt", first_err);

                let strict_prompt = PromptBuilder::new(&request.text).strict().build();
                let retry_response = self.call_llm_with_timeout(strict_prompt).await?;

                let items = parse_llm_response(&retry_response)?;
                info!("Strict retry parsed {} raw action items", items.len());
                Ok(items)
            }
        }
    }

    async fn call_llm_with_timeout(&self, prompt: String) -> Result<String, ExtractorError> {
        timeout(self.config.extraction_timeout(), self.call_llm(prompt))
            .await
            .map_err(|_| ExtractorError::Timeout)?
    }

    /// Call the LLM provider
    async fn call_llm(&self, prompt: String) -> Result<String, ExtractorError> {
        let llm = Arc::clone(&self.provider);

        // Call in a blocking context since LlmProvider is not async
        tokio::task::spawn_blocking(move || {
            llm.generate(&prompt)
                .map_err(|e| ExtractorError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| ExtractorError::Llm(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adjutant_domain::{Provenance, SourceKind};
    use adjutant_llm::MockProvider;

    fn request(text: &str) -> ExtractionRequest {
        ExtractionRequest::new(text, Provenance::new(SourceKind::NotesText))
    }

    #[tokio::test]
    async fn test_extract_empty_input_skips_model() {
        let llm = MockProvider::new("[]");
        let engine = ExtractionEngine::new(llm.clone(), EngineConfig::default());

        let items = engine.extract(&request("")).await.unwrap();
        assert!(items.is_empty());

        let items = engine.extract(&request("   \n\t ")).await.unwrap();
        assert!(items.is_empty());

        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extract_text_too_long() {
        let llm = MockProvider::new("[]");
        let mut config = EngineConfig::default();
        config.max_text_length = 100;
        let engine = ExtractionEngine::new(llm, config);

        let long_text = "a".repeat(200);
        let result = engine.extract(&request(&long_text)).await;
        assert!(matches!(result, Err(ExtractorError::TextTooLong(_, _))));
    }

    #[tokio::test]
    async fn test_extract_single_item() {
        let llm = MockProvider::new(r#"[{"text": "Email Nick", "status": "todo"}]"#);
        let engine = ExtractionEngine::new(llm.clone(), EngineConfig::default());

        let items = engine.extract(&request("0001 [TODO] Email Nick")).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text.as_deref(), Some("Email Nick"));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_retry_on_unparseable_then_success() {
        let llm = MockProvider::with_sequence(vec![
            "Sorry, here is some prose with no JSON".to_string(),
            r#"[{"text": "Email Nick"}]"#.to_string(),
        ]);
        let engine = ExtractionEngine::new(llm.clone(), EngineConfig::default());

        let items = engine.extract(&request("Email Nick")).await.unwrap();
        assert_eq!(items.len(), 1);
        // Exactly two calls: the original and the strict retry
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_no_second_retry() {
        let llm = MockProvider::new("never valid json");
        let engine = ExtractionEngine::new(llm.clone(), EngineConfig::default());

        let result = engine.extract(&request("Email Nick")).await;
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_llm_error_surfaces() {
        let mut llm = MockProvider::default();
        let prompt = PromptBuilder::new("Email Nick").build();
        llm.add_error(&prompt);
        let engine = ExtractionEngine::new(llm, EngineConfig::default());

        let result = engine.extract(&request("Email Nick")).await;
        assert!(matches!(result, Err(ExtractorError::Llm(_))));
    }
}
