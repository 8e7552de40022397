//! Trait definitions for external capabilities
//!
//! These traits define the boundaries between the fact-checking core and the
//! inference/retrieval services it orchestrates. Implementations live in
//! `verity-providers`. Every trait is object safe and `Send + Sync` so one
//! handle can be built at startup and shared by every request.

use crate::{CapabilityError, Entailment, ExtractedAnswer, KnowledgeHit, SearchHit};

/// Result alias for capability calls
pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// One binary claim-detection model
///
/// Returns the raw (unnormalized) score vector `[non_claim, claim]`.
pub trait ClaimScorer: Send + Sync {
    /// Model name, used in logs
    fn name(&self) -> &str;

    /// Raw scores for a sentence
    fn scores(&self, text: &str) -> CapabilityResult<Vec<f64>>;
}

/// Semantic similarity between two texts
pub trait SimilarityModel: Send + Sync {
    /// Similarity score (cosine for embedding models)
    fn similarity(&self, a: &str, b: &str) -> CapabilityResult<f64>;
}

/// Extractive question answering
pub trait AnswerExtractor: Send + Sync {
    /// Extract the best answer span for `question` from `context`
    fn extract(&self, question: &str, context: &str) -> CapabilityResult<ExtractedAnswer>;
}

/// Generative reasoning over a combined context
pub trait AnswerGenerator: Send + Sync {
    /// Generate an answer bounded to `max_length` output tokens
    fn generate(&self, question: &str, context: &str, max_length: usize)
        -> CapabilityResult<String>;
}

/// Entailment (NLI) classification
pub trait EntailmentClassifier: Send + Sync {
    /// Classify the relation between a claim and an answer
    fn classify(&self, claim: &str, answer: &str) -> CapabilityResult<Entailment>;
}

/// Web search
pub trait WebSearch: Send + Sync {
    /// Return at most `limit` results for `query`
    fn search(&self, query: &str, limit: usize) -> CapabilityResult<Vec<SearchHit>>;
}

/// Page text retrieval
///
/// Fails soft: any network or parse error yields an empty string.
pub trait PageFetcher: Send + Sync {
    /// Readable text of the page at `url`
    fn fetch_text(&self, url: &str) -> String;
}

/// Structured knowledge-base lookup
///
/// Implementations report rate-limit responses as [`CapabilityError::RateLimited`]
/// so callers can back off.
pub trait KnowledgeBase: Send + Sync {
    /// Entities matching the text
    fn query(&self, text: &str) -> CapabilityResult<Vec<KnowledgeHit>>;
}

/// Sentence segmentation
pub trait SentenceSegmenter: Send + Sync {
    /// Ordered, trimmed, non-empty sentences
    fn segment(&self, text: &str) -> Vec<String>;
}
