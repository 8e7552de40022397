//! Multi-hop synthesis over several accepted passages

use crate::verifier::EvidenceVerifier;
use std::sync::Arc;
use tracing::{debug, warn};
use verity_domain::traits::AnswerGenerator;
use verity_domain::{Judgment, RelevantPassage};

/// Fuses all accepted passages of a claim into one synthesized answer
pub struct MultiHopSynthesizer {
    generator: Arc<dyn AnswerGenerator>,
    max_length: usize,
}

impl MultiHopSynthesizer {
    /// Create a synthesizer bounded to `max_length` output tokens
    pub fn new(generator: Arc<dyn AnswerGenerator>, max_length: usize) -> Self {
        Self {
            generator,
            max_length,
        }
    }

    /// The extra judgment for a claim with more than one accepted passage
    ///
    /// The synthesized answer is verified without a QA threshold. Its sources
    /// are every source collected for the claim.
    pub fn judge(
        &self,
        claim: &str,
        passages: &[RelevantPassage],
        verifier: &EvidenceVerifier,
    ) -> Option<Judgment> {
        if passages.len() < 2 {
            return None;
        }

        let context = passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let answer = match self.generator.generate(claim, &context, self.max_length) {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Multi-hop generation failed: {}", e);
                return None;
            }
        };

        match verifier.verify(claim, &answer) {
            Ok((label, confidence)) => {
                debug!(
                    "Multi-hop verification over {} passages: {} ({:.4})",
                    passages.len(),
                    label,
                    confidence
                );
                let sources = passages.iter().map(|p| p.source.clone()).collect();
                Some(Judgment::new(claim, answer, sources, label, confidence))
            }
            Err(e) => {
                warn!("Multi-hop entailment failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::{CapabilityError, Label, NliRelation};
    use verity_providers::mock::{MockAnswerExtractor, MockEntailment, MockGenerator};

    fn verifier() -> EvidenceVerifier {
        EvidenceVerifier::new(
            Arc::new(MockAnswerExtractor::new("", 0.0)),
            Arc::new(MockEntailment::new(NliRelation::Entailment, 0.8)),
            // Synthesized answers bypass this threshold
            0.99,
        )
    }

    fn passages() -> Vec<RelevantPassage> {
        vec![
            RelevantPassage::new("first excerpt", "https://a.example"),
            RelevantPassage::new("Eiffel Tower: tower in Paris", "http://www.wikidata.org/entity/Q243"),
        ]
    }

    #[test]
    fn test_single_passage_is_not_synthesized() {
        let generator = MockGenerator::new("Paris");
        let synthesizer = MultiHopSynthesizer::new(Arc::new(generator.clone()), 50);
        assert!(synthesizer.judge("c", &passages()[..1], &verifier()).is_none());
        assert!(generator.calls().is_empty());
    }

    #[test]
    fn test_joins_context_and_collects_all_sources() {
        let generator = MockGenerator::new("Paris");
        let synthesizer = MultiHopSynthesizer::new(Arc::new(generator.clone()), 50);
        let judgment = synthesizer.judge("Where?", &passages(), &verifier()).unwrap();

        assert_eq!(
            generator.calls(),
            vec![(
                "Where?".to_string(),
                "first excerpt Eiffel Tower: tower in Paris".to_string(),
                50
            )]
        );
        assert_eq!(judgment.evidence, "Paris");
        assert_eq!(judgment.label, Label::Supported);
        assert_eq!(
            judgment.sources,
            vec!["https://a.example", "http://www.wikidata.org/entity/Q243"]
        );
    }

    #[test]
    fn test_generation_failure_skips_judgment() {
        let synthesizer = MultiHopSynthesizer::new(
            Arc::new(MockGenerator::failing(CapabilityError::Unavailable("oom".into()))),
            50,
        );
        assert!(synthesizer.judge("c", &passages(), &verifier()).is_none());
    }
}
