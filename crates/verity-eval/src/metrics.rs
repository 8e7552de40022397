//! Classification report over predicted and ground-truth labels
//!
//! Per-class precision, recall, F1 and support with macro and
//! support-weighted averages. Undefined ratios (no predictions or no support
//! for a class) count as 0.0.

use serde::Serialize;
use verity_domain::Label;
use verity_pipeline::ClaimCheck;

/// Classes reported, in order
pub const REPORT_LABELS: [&str; 4] = [
    Label::Supported.as_str(),
    Label::Refuted.as_str(),
    Label::NotEnoughInformation.as_str(),
    ClaimCheck::NOT_A_CLAIM,
];

/// Metrics for one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Averaged precision, recall and F1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct Averages {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Full classification report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub macro_avg: Averages,
    pub weighted_avg: Averages,
    pub accuracy: f64,
    pub total: usize,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ClassificationReport {
    /// Compute the report for paired truth/prediction labels over `labels`
    ///
    /// Accuracy counts every pair, including labels outside `labels`.
    pub fn compute<S: AsRef<str>>(truth: &[S], predicted: &[S], labels: &[&str]) -> Self {
        let pairs: Vec<(&str, &str)> = truth
            .iter()
            .zip(predicted)
            .map(|(t, p)| (t.as_ref(), p.as_ref()))
            .collect();

        let classes: Vec<ClassMetrics> = labels
            .iter()
            .map(|&label| {
                let true_positive = pairs.iter().filter(|(t, p)| *t == label && *p == label).count();
                let predicted_count = pairs.iter().filter(|(_, p)| *p == label).count();
                let support = pairs.iter().filter(|(t, _)| *t == label).count();
                let precision = ratio(true_positive, predicted_count);
                let recall = ratio(true_positive, support);
                ClassMetrics {
                    label: label.to_string(),
                    precision,
                    recall,
                    f1: f1(precision, recall),
                    support,
                }
            })
            .collect();

        let macro_avg = if classes.is_empty() {
            Averages::default()
        } else {
            let n = classes.len() as f64;
            Averages {
                precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
                recall: classes.iter().map(|c| c.recall).sum::<f64>() / n,
                f1: classes.iter().map(|c| c.f1).sum::<f64>() / n,
            }
        };

        let total_support: usize = classes.iter().map(|c| c.support).sum();
        let weighted_avg = if total_support == 0 {
            Averages::default()
        } else {
            let weighted = |value: fn(&ClassMetrics) -> f64| {
                classes
                    .iter()
                    .map(|c| value(c) * c.support as f64)
                    .sum::<f64>()
                    / total_support as f64
            };
            Averages {
                precision: weighted(|c: &ClassMetrics| c.precision),
                recall: weighted(|c: &ClassMetrics| c.recall),
                f1: weighted(|c: &ClassMetrics| c.f1),
            }
        };

        let correct = pairs.iter().filter(|(t, p)| t == p).count();

        Self {
            classes,
            macro_avg,
            weighted_avg,
            accuracy: ratio(correct, pairs.len()),
            total: pairs.len(),
        }
    }

    /// Metrics for one class, if reported
    pub fn class(&self, label: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_report_labels() {
        assert_eq!(
            REPORT_LABELS,
            ["Supported", "Refuted", "Not Enough Information", "Not a Claim"]
        );
    }

    #[test]
    fn test_per_class_metrics() {
        let truth = ["Supported", "Supported", "Refuted", "Refuted", "Not Enough Information"];
        let predicted = ["Supported", "Refuted", "Refuted", "Not a Claim", "Not Enough Information"];
        let report = ClassificationReport::compute(&truth, &predicted, &REPORT_LABELS);

        let supported = report.class("Supported").unwrap();
        assert!(close(supported.precision, 1.0));
        assert!(close(supported.recall, 0.5));
        assert!(close(supported.f1, 2.0 / 3.0));
        assert_eq!(supported.support, 2);

        let refuted = report.class("Refuted").unwrap();
        assert!(close(refuted.precision, 0.5));
        assert!(close(refuted.recall, 0.5));

        let not_a_claim = report.class("Not a Claim").unwrap();
        assert_eq!(not_a_claim.support, 0);
        assert!(close(not_a_claim.precision, 0.0));
        assert!(close(not_a_claim.f1, 0.0));

        assert!(close(report.accuracy, 0.6));
        assert_eq!(report.total, 5);
    }

    #[test]
    fn test_macro_and_weighted_averages() {
        let truth = ["Supported", "Supported", "Supported", "Refuted"];
        let predicted = ["Supported", "Supported", "Supported", "Supported"];
        let report = ClassificationReport::compute(&truth, &predicted, &["Supported", "Refuted"]);

        // Supported: p = 0.75, r = 1.0; Refuted: all zero
        assert!(close(report.macro_avg.precision, 0.375));
        assert!(close(report.macro_avg.recall, 0.5));
        assert!(close(report.weighted_avg.precision, 0.5625));
        assert!(close(report.weighted_avg.recall, 0.75));
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        let report = ClassificationReport::compute(&empty, &empty, &REPORT_LABELS);
        assert_eq!(report.total, 0);
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.weighted_avg, Averages::default());
    }
}
