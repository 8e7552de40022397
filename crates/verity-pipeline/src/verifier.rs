//! Answer extraction and entailment verification

use std::sync::Arc;
use tracing::{debug, warn};
use verity_domain::traits::{AnswerExtractor, CapabilityResult, EntailmentClassifier};
use verity_domain::{Judgment, Label, RelevantPassage};

/// Turns accepted passages into judgments
pub struct EvidenceVerifier {
    extractor: Arc<dyn AnswerExtractor>,
    classifier: Arc<dyn EntailmentClassifier>,
    answer_threshold: f64,
}

impl EvidenceVerifier {
    /// Create a verifier accepting answers scored above `answer_threshold`
    pub fn new(
        extractor: Arc<dyn AnswerExtractor>,
        classifier: Arc<dyn EntailmentClassifier>,
        answer_threshold: f64,
    ) -> Self {
        Self {
            extractor,
            classifier,
            answer_threshold,
        }
    }

    /// Label and clamped confidence for a (claim, answer) pair
    pub fn verify(&self, claim: &str, answer: &str) -> CapabilityResult<(Label, f64)> {
        let entailment = self.classifier.classify(claim, answer)?;
        let confidence = if entailment.confidence.is_nan() {
            0.0
        } else {
            entailment.confidence.clamp(0.0, 1.0)
        };
        Ok((Label::from(entailment.relation), confidence))
    }

    /// Judge one passage: extract an answer, then verify it
    ///
    /// Returns `None` when the answer scores at or below the threshold or a
    /// capability call fails.
    pub fn judge_passage(&self, claim: &str, passage: &RelevantPassage) -> Option<Judgment> {
        let extracted = match self.extractor.extract(claim, &passage.text) {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!("Answer extraction failed for {}: {}", passage.source, e);
                return None;
            }
        };

        let accepted = extracted.score > self.answer_threshold;
        if !accepted {
            debug!(
                "No relevant answer in {} (score {:.4})",
                passage.source, extracted.score
            );
            return None;
        }

        match self.verify(claim, &extracted.answer) {
            Ok((label, confidence)) => {
                debug!(
                    "Verification result for {}: {} ({:.4})",
                    passage.source, label, confidence
                );
                Some(Judgment::new(
                    claim,
                    passage.text.clone(),
                    vec![passage.source.clone()],
                    label,
                    confidence,
                ))
            }
            Err(e) => {
                warn!("Entailment failed for {}: {}", passage.source, e);
                None
            }
        }
    }
}
