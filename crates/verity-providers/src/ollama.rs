//! Ollama Provider Implementation
//!
//! Integration with Ollama's local API. Used for multi-hop answer synthesis
//! (`/api/generate`) and, optionally, for sentence embeddings
//! (`/api/embeddings`) behind relevance ranking.
//!
//! # Features
//!
//! - Blocking HTTP communication (the pipeline is synchronous)
//! - Output length bound through `num_predict`
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use verity_providers::OllamaProvider;
//! use verity_domain::traits::AnswerGenerator;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3").unwrap();
//! let answer = provider.generate("Where is the Eiffel Tower?", "It stands in Paris.", 50);
//! ```

use crate::embedding::EmbeddingModel;
use crate::http::{build_client, join_url, DEFAULT_TIMEOUT_SECS};
use crate::ProviderError;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use verity_domain::traits::{AnswerGenerator, CapabilityResult};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API provider
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    embedding_model: Option<String>,
    client: Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: usize,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaProvider {
    /// Create a new Ollama provider for `model`
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            embedding_model: None,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider against `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Use a separate model for embeddings (defaults to the generation model)
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = Some(model.into());
        self
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Build the synthesis prompt for a question over a combined context
    pub fn synthesis_prompt(question: &str, context: &str) -> String {
        format!(
            "Answer the question using only the context. Reply with a short answer.\n\n\
             Question: {}\n\nContext: {}\n\nAnswer:",
            question, context
        )
    }

    /// Generate text, retrying transient failures with exponential backoff
    pub fn complete(&self, prompt: String, max_tokens: usize) -> Result<String, ProviderError> {
        let url = join_url(&self.endpoint, "api/generate");
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: max_tokens,
                temperature: 0.0,
            },
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send() {
                Ok(response) if response.status().is_success() => {
                    return response
                        .json::<GenerateResponse>()
                        .map(|r| r.response.trim().to_string())
                        .map_err(|e| {
                            ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
                        });
                }
                Ok(response) if response.status() == reqwest::StatusCode::NOT_FOUND => {
                    return Err(ProviderError::ModelNotAvailable(self.model.clone()));
                }
                Ok(response) => {
                    let status = response.status();
                    let error_text = response
                        .text()
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    last_error = Some(ProviderError::Communication(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
                Err(e) => {
                    last_error = Some(ProviderError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Ollama request failed, retrying in {:?}", delay);
                std::thread::sleep(delay);
            }
        }

        Err(last_error
            .unwrap_or_else(|| ProviderError::Communication("Max retries exceeded".to_string())))
    }
}

impl AnswerGenerator for OllamaProvider {
    fn generate(
        &self,
        question: &str,
        context: &str,
        max_length: usize,
    ) -> CapabilityResult<String> {
        debug!("Synthesizing answer over {} chars of context", context.len());
        Ok(self.complete(Self::synthesis_prompt(question, context), max_length)?)
    }
}

impl EmbeddingModel for OllamaProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let url = join_url(&self.endpoint, "api/embeddings");
        let model = self.embedding_model.as_deref().unwrap_or(&self.model);
        let response = self
            .client
            .post(&url)
            .json(&EmbeddingRequest { model, prompt: text })
            .send()?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::ModelNotAvailable(model.to_string()));
        }
        let response = crate::http::check_status(response)?;
        let body: EmbeddingResponse = response.json()?;
        if body.embedding.is_empty() {
            return Err(ProviderError::InvalidResponse("empty embedding".to_string()));
        }
        Ok(body.embedding)
    }

    fn dimension(&self) -> usize {
        // Known only after the first call; callers compare widths per pair.
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434", "llama3").unwrap();
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.model, "llama3");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
        assert!(provider.embedding_model.is_none());
    }

    #[test]
    fn test_ollama_provider_builders() {
        let provider = OllamaProvider::default_endpoint("mistral")
            .unwrap()
            .with_max_retries(0)
            .with_embedding_model("nomic-embed-text");
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.max_retries, 1);
        assert_eq!(provider.embedding_model.as_deref(), Some("nomic-embed-text"));
    }

    #[test]
    fn test_synthesis_prompt_contains_question_and_context() {
        let prompt = OllamaProvider::synthesis_prompt("Is it in Paris?", "The tower is in Paris.");
        assert!(prompt.contains("Question: Is it in Paris?"));
        assert!(prompt.contains("Context: The tower is in Paris."));
    }

    #[test]
    fn test_ollama_error_handling() {
        // Invalid port triggers a communication error without retries
        let provider = OllamaProvider::new("http://localhost:99999", "llama3")
            .unwrap()
            .with_max_retries(1);

        let result = provider.complete("test".to_string(), 10);
        assert!(matches!(result, Err(ProviderError::Communication(_))));
    }

    // Requires a running Ollama instance
    #[test]
    #[ignore]
    fn test_ollama_generate_integration() {
        let provider = OllamaProvider::default_endpoint("llama3").unwrap();
        let answer = provider.generate("What colour is the sky?", "The sky is blue.", 10);
        if let Ok(answer) = answer {
            assert!(!answer.is_empty());
        }
    }
}
