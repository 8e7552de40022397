//! Verdict aggregation
//!
//! Reconciles every judgment produced for one claim into a single verdict:
//! 1. No judgments, no verdict
//! 2. Majority label, ties going to the label seen first
//! 3. Mean confidence (over all judgments by default)
//! 4. Flattened, order-preserving deduplication of sources

use crate::judgment::clamp_unit;
use crate::{Judgment, Label, Verdict};
use std::collections::HashSet;

/// Which judgments contribute to the verdict confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfidencePolicy {
    /// Mean over every judgment for the claim, whatever its label
    #[default]
    AllJudgments,

    /// Mean over the judgments carrying the winning label only
    WinnerOnly,
}

/// Aggregate one claim's judgments with [`ConfidencePolicy::AllJudgments`]
///
/// # Examples
///
/// ```
/// use verity_domain::{aggregate, Judgment, Label};
///
/// let judgments = vec![
///     Judgment::new("c", "a", vec!["A".into()], Label::Supported, 0.9),
///     Judgment::new("c", "b", vec!["B".into(), "A".into()], Label::Supported, 0.7),
///     Judgment::new("c", "d", vec!["C".into()], Label::Refuted, 0.6),
/// ];
/// let verdict = aggregate("c", &judgments).unwrap();
/// assert_eq!(verdict.label, Label::Supported);
/// assert!((verdict.confidence - 2.2 / 3.0).abs() < 1e-9);
/// assert_eq!(verdict.evidence_links, vec!["A", "B", "C"]);
/// ```
pub fn aggregate(claim: &str, judgments: &[Judgment]) -> Option<Verdict> {
    aggregate_with_policy(claim, judgments, ConfidencePolicy::AllJudgments)
}

/// Aggregate one claim's judgments with an explicit confidence policy
pub fn aggregate_with_policy(
    claim: &str,
    judgments: &[Judgment],
    policy: ConfidencePolicy,
) -> Option<Verdict> {
    let label = majority_label(judgments)?;

    let confidence = match policy {
        ConfidencePolicy::AllJudgments => mean_confidence(judgments.iter()),
        ConfidencePolicy::WinnerOnly => {
            mean_confidence(judgments.iter().filter(|j| j.label == label))
        }
    };

    Some(Verdict {
        claim: claim.to_string(),
        label,
        confidence,
        evidence_links: evidence_links(judgments),
    })
}

/// Most frequent label; ties go to the label encountered first
pub fn majority_label(judgments: &[Judgment]) -> Option<Label> {
    // (label, count) in first-encounter order
    let mut counts: Vec<(Label, usize)> = Vec::with_capacity(Label::ALL.len());
    for judgment in judgments {
        match counts.iter_mut().find(|(label, _)| *label == judgment.label) {
            Some((_, count)) => *count += 1,
            None => counts.push((judgment.label, 1)),
        }
    }

    let mut best: Option<(Label, usize)> = None;
    for (label, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label)
}

/// Flatten every judgment's sources, dropping repeats but keeping first-seen order
pub fn evidence_links(judgments: &[Judgment]) -> Vec<String> {
    let mut seen = HashSet::new();
    judgments
        .iter()
        .flat_map(|j| j.sources.iter())
        .filter(|source| seen.insert(source.as_str()))
        .cloned()
        .collect()
}

fn mean_confidence<'a>(judgments: impl Iterator<Item = &'a Judgment>) -> f64 {
    let (sum, count) = judgments.fold((0.0, 0usize), |(sum, count), j| {
        (sum + j.confidence, count + 1)
    });
    if count == 0 {
        return 0.0;
    }
    clamp_unit(sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn judgment(label: Label, confidence: f64, sources: &[&str]) -> Judgment {
        Judgment::new(
            "claim",
            "evidence",
            sources.iter().map(|s| s.to_string()).collect(),
            label,
            confidence,
        )
    }

    #[test]
    fn test_no_judgments_no_verdict() {
        assert!(aggregate("claim", &[]).is_none());
    }

    #[test]
    fn test_majority_vote_averages_all_judgments() {
        let judgments = vec![
            judgment(Label::Supported, 0.9, &["a"]),
            judgment(Label::Supported, 0.7, &["b"]),
            judgment(Label::Refuted, 0.6, &["c"]),
        ];

        let verdict = aggregate("claim", &judgments).unwrap();

        assert_eq!(verdict.label, Label::Supported);
        // Mean of all three, not just the Supported ones (0.8)
        assert!((verdict.confidence - (0.9 + 0.7 + 0.6) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_winner_only_policy() {
        let judgments = vec![
            judgment(Label::Supported, 0.9, &["a"]),
            judgment(Label::Supported, 0.7, &["b"]),
            judgment(Label::Refuted, 0.6, &["c"]),
        ];

        let verdict =
            aggregate_with_policy("claim", &judgments, ConfidencePolicy::WinnerOnly).unwrap();

        assert_eq!(verdict.label, Label::Supported);
        assert!((verdict.confidence - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_tie_goes_to_first_encountered() {
        let judgments = vec![
            judgment(Label::Refuted, 0.5, &["a"]),
            judgment(Label::Supported, 0.9, &["b"]),
        ];
        assert_eq!(majority_label(&judgments), Some(Label::Refuted));

        let reversed = vec![judgments[1].clone(), judgments[0].clone()];
        assert_eq!(majority_label(&reversed), Some(Label::Supported));
    }

    #[test]
    fn test_three_way_tie_goes_to_first() {
        let judgments = vec![
            judgment(Label::NotEnoughInformation, 0.4, &["a"]),
            judgment(Label::Refuted, 0.5, &["b"]),
            judgment(Label::Supported, 0.6, &["c"]),
        ];
        assert_eq!(majority_label(&judgments), Some(Label::NotEnoughInformation));
    }

    #[test]
    fn test_evidence_links_flattened_and_deduplicated() {
        let judgments = vec![
            judgment(Label::Supported, 0.8, &["A"]),
            judgment(Label::Supported, 0.6, &["B", "C", "A"]),
        ];

        let verdict = aggregate("claim", &judgments).unwrap();

        assert_eq!(verdict.evidence_links, vec!["A", "B", "C"]);
    }
}
