//! Judgments and verdicts

use crate::Label;

/// A single label + confidence derived from one answer for one claim
///
/// `sources` is always a list: a singleton for per-evidence judgments and
/// every collected source for the multi-hop judgment.
#[derive(Debug, Clone, PartialEq)]
pub struct Judgment {
    /// Text of the judged claim
    pub claim: String,

    /// Evidence text or answer the label was derived from
    pub evidence: String,

    /// Source references backing this judgment
    pub sources: Vec<String>,

    /// Entailment-derived label
    pub label: Label,

    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl Judgment {
    /// Create a judgment; confidence is clamped into [0, 1] (NaN becomes 0)
    pub fn new(
        claim: impl Into<String>,
        evidence: impl Into<String>,
        sources: Vec<String>,
        label: Label,
        confidence: f64,
    ) -> Self {
        Self {
            claim: claim.into(),
            evidence: evidence.into(),
            sources,
            label,
            confidence: clamp_unit(confidence),
        }
    }
}

/// Final per-claim output
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Text of the claim
    pub claim: String,

    /// Majority label
    pub label: Label,

    /// Aggregated confidence in [0, 1]
    pub confidence: f64,

    /// Deduplicated source references, in first-seen order
    pub evidence_links: Vec<String>,
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judgment_clamps_confidence() {
        let high = Judgment::new("c", "e", vec!["s".into()], Label::Supported, 1.5);
        let low = Judgment::new("c", "e", vec!["s".into()], Label::Refuted, -0.2);
        let nan = Judgment::new("c", "e", vec![], Label::Refuted, f64::NAN);
        assert_eq!(high.confidence, 1.0);
        assert_eq!(low.confidence, 0.0);
        assert_eq!(nan.confidence, 0.0);
    }
}
