//! Embedding Models for Semantic Similarity
//!
//! Relevance ranking needs a similarity score between a claim and a passage.
//! Any [`EmbeddingModel`] becomes a [`SimilarityModel`] through
//! [`EmbeddingSimilarity`], which compares embeddings with cosine similarity.
//!
//! # Models
//!
//! - **BagOfWordsEmbedding**: hashed term-frequency vectors, fully offline and
//!   deterministic. Texts sharing vocabulary score high.
//! - **OllamaProvider**: real sentence embeddings from a local Ollama model.
//!
//! # Examples
//!
//! ```rust
//! use verity_providers::embedding::{BagOfWordsEmbedding, EmbeddingModel, EmbeddingSimilarity};
//! use verity_domain::traits::SimilarityModel;
//!
//! let model = BagOfWordsEmbedding::new(256);
//! let embedding = model.embed("The sky is blue").unwrap();
//! assert_eq!(embedding.len(), 256);
//!
//! let similarity = EmbeddingSimilarity::new(model);
//! let close = similarity.similarity("the sky is blue", "the blue sky").unwrap();
//! let far = similarity.similarity("the sky is blue", "stock markets fell").unwrap();
//! assert!(close > far);
//! ```

use crate::ProviderError;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use verity_domain::traits::{CapabilityResult, SimilarityModel};
use verity_domain::CapabilityError;

/// Trait for embedding models
pub trait EmbeddingModel: Send + Sync {
    /// Generate an embedding vector for the given text
    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Get the dimension of embeddings produced by this model
    fn dimension(&self) -> usize;
}

/// Words too common to carry meaning for relevance
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "i", "in",
    "is", "it", "its", "of", "on", "or", "that", "the", "this", "to", "was", "were", "with",
];

/// Hashed bag-of-words embedding
///
/// Each content word is hashed into one of `dimension` buckets; the bucket
/// counts are normalized to unit length. Deterministic and offline.
pub struct BagOfWordsEmbedding {
    dimension: usize,
}

impl BagOfWordsEmbedding {
    /// Create a new bag-of-words model
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        (hasher.finish() % self.dimension as u64) as usize
    }
}

impl Default for BagOfWordsEmbedding {
    fn default() -> Self {
        Self::new(512)
    }
}

/// Lowercased alphanumeric words minus stopwords
pub fn content_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
}

impl EmbeddingModel for BagOfWordsEmbedding {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let mut embedding = vec![0.0f32; self.dimension];
        for word in content_words(text) {
            embedding[self.bucket(&word)] += 1.0;
        }

        // Normalize to unit length for cosine similarity
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Calculate cosine similarity between two embedding vectors
///
/// Returns a value in [-1, 1]; zero vectors compare as 0.0. Both vectors must
/// have the same length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have same length");

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

/// Similarity capability backed by an embedding model
pub struct EmbeddingSimilarity<E> {
    model: E,
}

impl<E: EmbeddingModel> EmbeddingSimilarity<E> {
    /// Wrap an embedding model
    pub fn new(model: E) -> Self {
        Self { model }
    }
}

impl<E: EmbeddingModel> SimilarityModel for EmbeddingSimilarity<E> {
    fn similarity(&self, a: &str, b: &str) -> CapabilityResult<f64> {
        let left = self.model.embed(a)?;
        let right = self.model.embed(b)?;
        if left.len() != right.len() {
            return Err(CapabilityError::InvalidOutput(format!(
                "embedding widths differ: {} vs {}",
                left.len(),
                right.len()
            )));
        }
        Ok(cosine_similarity(&left, &right) as f64)
    }
}
