//! Relevance ranking of evidence passages

use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, warn};
use verity_domain::traits::{CapabilityResult, SimilarityModel};
use verity_domain::{EvidenceItem, RelevantPassage};

/// Naive passage boundary inside a document
const PASSAGE_SEPARATOR: &str = ". ";

/// Selects the claim-relevant part of each evidence document
pub struct RelevanceRanker {
    similarity: Arc<dyn SimilarityModel>,
    top_k: usize,
    threshold: f64,
}

impl RelevanceRanker {
    /// Create a ranker keeping `top_k` passages and gating at `threshold`
    pub fn new(similarity: Arc<dyn SimilarityModel>, top_k: usize, threshold: f64) -> Self {
        Self {
            similarity,
            top_k,
            threshold,
        }
    }

    /// The `top_k` passages most similar to the claim, best first, space-joined
    ///
    /// Ties keep document order. Returns an empty string for a document
    /// without passages.
    pub fn select_passages(&self, claim: &str, document: &str) -> CapabilityResult<String> {
        let mut scored = Vec::new();
        for passage in split_passages(document) {
            let score = self.similarity.similarity(claim, passage)?;
            scored.push((passage, if score.is_nan() { f64::NEG_INFINITY } else { score }));
        }

        // sort_by is stable, so equal scores (0.0 and -0.0 included) keep
        // their original order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(self.top_k)
            .map(|(passage, _)| passage)
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// Rank one evidence item; `None` when it is irrelevant or scoring failed
    pub fn rank(&self, claim: &str, item: &EvidenceItem) -> Option<RelevantPassage> {
        let excerpt = match self.select_passages(claim, &item.content) {
            Ok(excerpt) if !excerpt.trim().is_empty() => excerpt,
            Ok(_) => return None,
            Err(e) => {
                warn!("Similarity failed for {}: {}; dropping", item.source, e);
                return None;
            }
        };

        match self.similarity.similarity(claim, &excerpt) {
            Ok(score) if score >= self.threshold => {
                debug!("Accepted {} (similarity {:.4})", item.source, score);
                Some(RelevantPassage::new(excerpt, item.source.clone()))
            }
            Ok(score) => {
                debug!(
                    "Evidence from {} not relevant enough (similarity {:.4})",
                    item.source, score
                );
                None
            }
            Err(e) => {
                warn!("Similarity failed for {}: {}; dropping", item.source, e);
                None
            }
        }
    }
}

/// Split on `". "`, dropping blank passages
pub fn split_passages(document: &str) -> impl Iterator<Item = &str> {
    document
        .split(PASSAGE_SEPARATOR)
        .filter(|passage| !passage.trim().is_empty())
}
