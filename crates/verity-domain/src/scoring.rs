//! Score-vector math shared by classifiers
//!
//! Raw model outputs are unnormalized score vectors (logits). These helpers
//! average them, normalize them and pick the winning index.

/// Numerically stable softmax
///
/// Returns an empty vector for empty input.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return vec![0.0; scores.len()];
    }

    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();

    exps.iter().map(|e| e / sum).collect()
}

/// Index of the largest value; the first index wins ties
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Element-wise mean of equally-sized vectors
///
/// Returns `None` when there are no vectors or their widths differ.
pub fn mean_vectors(vectors: &[Vec<f64>]) -> Option<Vec<f64>> {
    let width = vectors.first()?.len();
    if vectors.iter().any(|v| v.len() != width) {
        return None;
    }

    let mut sums = vec![0.0; width];
    for vector in vectors {
        for (sum, value) in sums.iter_mut().zip(vector) {
            *sum += value;
        }
    }

    let n = vectors.len() as f64;
    Some(sums.into_iter().map(|s| s / n).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let total: f64 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_two_wide() {
        // softmax([0.4, 1.4])[1] = 1 / (1 + e^-1)
        let probs = softmax(&[0.4, 1.4]);
        let expected = 1.0 / (1.0 + (-1.0f64).exp());
        assert!((probs[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_softmax_large_values_are_stable() {
        let probs = softmax(&[1000.0, 1000.0]);
        assert_eq!(probs, vec![0.5, 0.5]);
    }

    #[test]
    fn test_argmax_first_wins_ties() {
        assert_eq!(argmax(&[0.5, 0.5]), Some(0));
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_mean_vectors() {
        let mean = mean_vectors(&[vec![0.2, 1.8], vec![0.6, 1.0]]).unwrap();
        assert!((mean[0] - 0.4).abs() < 1e-12);
        assert!((mean[1] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_mean_vectors_rejects_mixed_widths() {
        assert!(mean_vectors(&[vec![1.0, 2.0], vec![1.0]]).is_none());
        assert!(mean_vectors(&[]).is_none());
    }
}
