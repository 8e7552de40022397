//! Claim screening
//!
//! Every model emits a raw `[non_claim, claim]` score vector. The ensemble
//! averages the raw vectors first and normalizes the mean with softmax; the
//! single-model screener is the same contract with one model.

use crate::error::ScreeningError;
use std::sync::Arc;
use tracing::{debug, warn};
use verity_domain::scoring::{argmax, mean_vectors, softmax};
use verity_domain::traits::ClaimScorer;
use verity_domain::{ClaimClass, Screening};

/// Width of a claim-detection score vector
pub const SCORE_WIDTH: usize = 2;

/// Claim screener over one or more scoring models
#[derive(Clone)]
pub enum Screener {
    /// One model
    Single(Arc<dyn ClaimScorer>),
    /// Several models whose raw scores are averaged
    Ensemble(Vec<Arc<dyn ClaimScorer>>),
}

impl Screener {
    /// Build the natural variant for a list of models
    pub fn from_models(mut models: Vec<Arc<dyn ClaimScorer>>) -> Self {
        if models.len() == 1 {
            if let Some(model) = models.pop() {
                return Screener::Single(model);
            }
        }
        Screener::Ensemble(models)
    }

    fn models(&self) -> &[Arc<dyn ClaimScorer>] {
        match self {
            Screener::Single(model) => std::slice::from_ref(model),
            Screener::Ensemble(models) => models,
        }
    }

    /// Number of models consulted per sentence
    pub fn len(&self) -> usize {
        self.models().len()
    }

    /// Whether the screener has no models
    pub fn is_empty(&self) -> bool {
        self.models().is_empty()
    }

    /// Screen one sentence
    ///
    /// Models that fail or return a malformed vector are skipped; when none
    /// remain the call fails with [`ScreeningError::InsufficientModelOutput`].
    pub fn screen(&self, sentence: &str) -> Result<Screening, ScreeningError> {
        let models = self.models();
        let mut vectors = Vec::with_capacity(models.len());

        for model in models {
            match model.scores(sentence) {
                Ok(scores) if scores.len() == SCORE_WIDTH && scores.iter().all(|s| s.is_finite()) => {
                    vectors.push(scores)
                }
                Ok(scores) => warn!(
                    "Model '{}' returned an incompatible score vector {:?}; skipping",
                    model.name(),
                    scores
                ),
                Err(e) => warn!("Model '{}' failed to score sentence: {}", model.name(), e),
            }
        }

        let insufficient = ScreeningError::InsufficientModelOutput {
            attempted: models.len(),
        };
        let mean = mean_vectors(&vectors).ok_or_else(|| insufficient.clone())?;
        let probabilities = softmax(&mean);
        let index = argmax(&probabilities).ok_or_else(|| insufficient.clone())?;
        let class = ClaimClass::from_index(index).ok_or(insufficient)?;

        let screening = Screening {
            class,
            confidence: probabilities[index],
        };
        debug!(
            "Screened '{}' as {} ({:.4}) from {} model(s)",
            sentence,
            screening.class,
            screening.confidence,
            vectors.len()
        );
        Ok(screening)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::CapabilityError;
    use verity_providers::mock::MockScorer;

    fn scorer(name: &str, scores: Vec<f64>) -> Arc<dyn ClaimScorer> {
        Arc::new(MockScorer::new(name, scores))
    }

    #[test]
    fn test_ensemble_averages_raw_scores_before_softmax() {
        let screener = Screener::Ensemble(vec![
            scorer("a", vec![0.2, 1.8]),
            scorer("b", vec![0.6, 1.0]),
        ]);
        let screening = screener.screen("Water boils at 100 degrees.").unwrap();
        let expected = softmax(&[0.4, 1.4])[1];
        assert_eq!(screening.class, ClaimClass::Claim);
        assert!((screening.confidence - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_matches_one_model_ensemble() {
        let single = Screener::Single(scorer("a", vec![1.0, 0.5]));
        let ensemble = Screener::Ensemble(vec![scorer("a", vec![1.0, 0.5])]);
        assert_eq!(single.screen("x").unwrap(), ensemble.screen("x").unwrap());
        assert_eq!(single.screen("x").unwrap().class, ClaimClass::NonClaim);
    }

    #[test]
    fn test_ties_pick_non_claim() {
        let screener = Screener::Single(scorer("a", vec![0.3, 0.3]));
        let screening = screener.screen("x").unwrap();
        assert_eq!(screening.class, ClaimClass::NonClaim);
        assert!((screening.confidence - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_malformed_and_failing_models_are_skipped() {
        let screener = Screener::Ensemble(vec![
            scorer("wide", vec![0.1, 0.2, 0.3]),
            Arc::new(MockScorer::failing("down", CapabilityError::Unavailable("503".into()))),
            scorer("good", vec![0.0, 2.0]),
        ]);
        let screening = screener.screen("x").unwrap();
        assert!((screening.confidence - softmax(&[0.0, 2.0])[1]).abs() < 1e-12);
    }

    #[test]
    fn test_all_models_skipped_is_fatal() {
        let screener = Screener::Ensemble(vec![
            scorer("wide", vec![0.1]),
            Arc::new(MockScorer::failing("down", CapabilityError::RateLimited)),
        ]);
        assert_eq!(
            screener.screen("x"),
            Err(ScreeningError::InsufficientModelOutput { attempted: 2 })
        );
    }

    #[test]
    fn test_empty_ensemble_is_fatal() {
        let screener = Screener::Ensemble(Vec::new());
        assert!(screener.is_empty());
        assert!(screener.screen("x").is_err());
    }

    #[test]
    fn test_from_models_picks_variant() {
        assert!(matches!(
            Screener::from_models(vec![scorer("a", vec![0.0, 1.0])]),
            Screener::Single(_)
        ));
        let ensemble = Screener::from_models(vec![
            scorer("a", vec![0.0, 1.0]),
            scorer("b", vec![0.0, 1.0]),
        ]);
        assert_eq!(ensemble.len(), 2);
    }
}
