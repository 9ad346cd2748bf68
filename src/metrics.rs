//! Metrics
//!
//! Scoring helpers shared by the trainer and the analyzer.

/// Deterministic, order-preserving map from drift accuracy to the
/// headline drift score.
pub type ScoreFn = fn(f64) -> f64;

/// Default drift score: rescale accuracy so that 0.5 (indistinguishable
/// distributions) maps to 0 and 1.0 (fully separable) maps to 1.
///
/// Accuracies below 0.5 are possible with small samples and map below
/// zero rather than being clamped.
pub fn rescale_accuracy(accuracy: f64) -> f64 {
    2.0 * accuracy - 1.0
}

/// Classification accuracy.
pub fn accuracy_score(y: &[u8], yhat: &[u8]) -> f64 {
    assert_eq!(y.len(), yhat.len(), "Label slices must align");
    assert!(!y.is_empty(), "Accuracy of an empty slice is undefined");
    let correct = y.iter().zip(yhat).filter(|(a, b)| a == b).count();
    correct as f64 / y.len() as f64
}

/// Round to two decimal places for presentation.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_score() {
        assert_eq!(accuracy_score(&[0, 1, 0, 1], &[0, 1, 0, 1]), 1.0);
        assert_eq!(accuracy_score(&[0, 1, 0, 1], &[0, 0, 0, 0]), 0.5);
        assert_eq!(accuracy_score(&[1, 1], &[0, 0]), 0.0);
    }

    #[test]
    fn test_rescale_accuracy() {
        assert_eq!(rescale_accuracy(0.5), 0.0);
        assert_eq!(rescale_accuracy(1.0), 1.0);
        // Order preserving, no clamping below 0.5.
        assert!(rescale_accuracy(0.4) < rescale_accuracy(0.5));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(75.556), 75.56);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(100.0 / 3.0), 33.33);
    }
}
