//! Chat-completions provider implementation
//!
//! Talks to any OpenAI-compatible chat-completions endpoint. The extraction
//! prompt asks for machine-parseable output, so requests pin temperature to
//! zero.
//!
//! # Features
//!
//! - Async HTTP communication via reqwest
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff
//! - Timeout handling

use crate::LlmError;
use adjutant_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default chat-completions API base
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default timeout for LLM requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Completion token budget; extraction output is a short JSON array
const MAX_TOKENS: u32 = 1500;

/// Chat-completions provider
pub struct OpenAiProvider {
    api_base: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl OpenAiProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `api_base`: API base URL (e.g., "https://api.openai.com/v1")
    /// - `api_key`: bearer token
    /// - `model`: model to use (e.g., "gpt-4o-mini")
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("reqwest client construction cannot fail with static options");

        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create a provider against the default API base and model
    pub fn default_endpoint(api_key: impl Into<String>) -> Self {
        Self::new(DEFAULT_API_BASE, api_key, DEFAULT_MODEL)
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Generate a completion for the prompt
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The API key is empty
    /// - Network communication fails after retries
    /// - The model is unknown to the endpoint
    /// - The response body does not carry a completion
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));

        let request_body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: 0.0,
            max_tokens: MAX_TOKENS,
        };

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    if response.status().is_success() {
                        return match response.json::<ChatResponse>().await {
                            Ok(chat) => chat
                                .choices
                                .into_iter()
                                .next()
                                .map(|c| c.message.content)
                                .ok_or_else(|| {
                                    LlmError::InvalidResponse("Empty choices array".to_string())
                                }),
                            Err(e) => Err(LlmError::InvalidResponse(format!(
                                "Failed to parse response: {}",
                                e
                            ))),
                        };
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper for async function
        tokio::runtime::Runtime::new()
            .map_err(|e| LlmError::Other(format!("Failed to create runtime: {}", e)))?
            .block_on(async { self.generate(prompt).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OpenAiProvider::new("https://api.openai.com/v1", "sk-test", "gpt-4o-mini");
        assert_eq!(provider.api_base, "https://api.openai.com/v1");
        assert_eq!(provider.model, "gpt-4o-mini");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_provider_default_endpoint() {
        let provider = OpenAiProvider::default_endpoint("sk-test");
        assert_eq!(provider.api_base, DEFAULT_API_BASE);
        assert_eq!(provider.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_provider_with_max_retries() {
        let provider = OpenAiProvider::default_endpoint("sk-test").with_max_retries(5);
        assert_eq!(provider.max_retries, 5);
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let provider = OpenAiProvider::new(DEFAULT_API_BASE, "", DEFAULT_MODEL);
        let result = provider.generate("test").await;
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_error_handling_unreachable_endpoint() {
        // Use invalid endpoint to trigger error
        let provider = OpenAiProvider::new("http://localhost:1", "sk-test", "gpt-4o-mini")
            .with_max_retries(1);

        let result = provider.generate("test").await;
        match result {
            Err(LlmError::Communication(_)) => {}
            other => panic!("Expected Communication error, got {:?}", other.err()),
        }
    }
}
