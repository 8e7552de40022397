//! Verity Provider Layer
//!
//! Implementations of the capability traits from `verity-domain`.
//!
//! # Providers
//!
//! - `mock`: deterministic, scriptable doubles for every capability
//! - `embedding`: embedding models and cosine similarity
//! - `OllamaProvider`: local Ollama API for generation and embeddings
//! - `ModelServerClient`: HTTP model-serving sidecar (claim scoring, QA, NLI)
//! - `GoogleSearch`: Google Custom Search JSON API
//! - `HttpPageFetcher`: paragraph text of a web page
//! - `WikidataClient`: Wikidata SPARQL entity lookup
//!
//! # Examples
//!
//! ```
//! use verity_providers::mock::MockGenerator;
//! use verity_domain::traits::AnswerGenerator;
//!
//! let generator = MockGenerator::new("Paris");
//! let answer = generator.generate("Where is the Eiffel Tower?", "context", 50).unwrap();
//! assert_eq!(answer, "Paris");
//! ```

#![warn(missing_docs)]

pub mod embedding;
pub mod fetch;
pub mod http;
pub mod mock;
pub mod model_server;
pub mod ollama;
pub mod search;
pub mod wikidata;

use thiserror::Error;
use verity_domain::CapabilityError;

pub use embedding::{BagOfWordsEmbedding, EmbeddingModel, EmbeddingSimilarity};
pub use fetch::HttpPageFetcher;
pub use model_server::{ModelServerClient, RemoteScorer};
pub use ollama::OllamaProvider;
pub use search::GoogleSearch;
pub use wikidata::WikidataClient;

/// Errors that can occur while talking to a provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Missing credentials or endpoint
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::InvalidResponse(e.to_string())
        } else if e.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) {
            ProviderError::RateLimitExceeded
        } else {
            ProviderError::Communication(e.to_string())
        }
    }
}

impl From<ProviderError> for CapabilityError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::RateLimitExceeded => CapabilityError::RateLimited,
            ProviderError::InvalidResponse(msg) => CapabilityError::InvalidOutput(msg),
            other => CapabilityError::Unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_maps_to_capability_error() {
        let err: CapabilityError = ProviderError::RateLimitExceeded.into();
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_invalid_response_maps_to_invalid_output() {
        let err: CapabilityError = ProviderError::InvalidResponse("bad json".into()).into();
        assert_eq!(err, CapabilityError::InvalidOutput("bad json".into()));
    }

    #[test]
    fn test_communication_maps_to_unavailable() {
        let err: CapabilityError = ProviderError::Communication("refused".into()).into();
        assert!(matches!(err, CapabilityError::Unavailable(msg) if msg.contains("refused")));
    }
}
