//! Feature importance comparison
//!
//! Aligns the production model's importances with the drift
//! classifier's, over the intersection of the two feature sets.
use crate::metrics::round2;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Smallest reported importance; anything below shows up as 0.01 so a
/// feature never silently disappears from the table.
const IMPORTANCE_FLOOR: f64 = 0.01;

/// Importance of one feature under both models, as percentages within
/// each model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportanceRecord {
    pub feature: String,
    pub original_model: f64,
    pub drift_model: f64,
}

/// Compare the production model's importances with the drift
/// classifier's.
///
/// The output covers exactly the intersection of both feature sets,
/// ordered by feature name so downstream comparisons are index-stable.
/// Each score is normalized to a percentage within its own model; the
/// two models are never normalized against each other.
pub fn compare_importance(
    original: &HashMap<String, f64>,
    drift: &HashMap<String, f64>,
) -> Vec<FeatureImportanceRecord> {
    let original = to_percentages(original);
    let drift = to_percentages(drift);

    let mut features: Vec<&String> = original.keys().filter(|k| drift.contains_key(*k)).collect();
    features.sort();

    features
        .into_iter()
        .map(|feature| FeatureImportanceRecord {
            feature: feature.clone(),
            original_model: present(original[feature]),
            drift_model: present(drift[feature]),
        })
        .collect()
}

fn present(pct: f64) -> f64 {
    let rounded = round2(pct);
    if rounded < IMPORTANCE_FLOOR {
        IMPORTANCE_FLOOR
    } else {
        rounded
    }
}

fn to_percentages(importance: &HashMap<String, f64>) -> HashMap<String, f64> {
    // Sum in sorted order to keep the normalization deterministic.
    let mut values: Vec<f64> = importance.values().copied().collect();
    values.sort_by(|a, b| a.total_cmp(b));
    let total: f64 = values.iter().sum();

    importance
        .iter()
        .map(|(k, v)| {
            let pct = if total > 0.0 { 100.0 * v / total } else { 0.0 };
            (k.clone(), pct)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_intersection_sorted_by_name() {
        let original = map(&[("b", 1.0), ("a", 3.0), ("only_original", 2.0)]);
        let drift = map(&[("a", 5.0), ("b", 5.0), ("only_drift", 1.0)]);

        let records = compare_importance(&original, &drift);
        let names: Vec<&str> = records.iter().map(|r| r.feature.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_scores_are_percentages_within_each_model() {
        let original = map(&[("a", 3.0), ("b", 1.0)]);
        let drift = map(&[("a", 1.0), ("b", 1.0)]);

        let records = compare_importance(&original, &drift);
        assert_eq!(records[0].original_model, 75.0);
        assert_eq!(records[0].drift_model, 50.0);
        assert_eq!(records[1].original_model, 25.0);
    }

    #[test]
    fn test_tiny_scores_are_floored() {
        let original = map(&[("a", 1000.0), ("b", 0.0)]);
        let drift = map(&[("a", 1.0), ("b", 1.0)]);

        let records = compare_importance(&original, &drift);
        assert_eq!(records[1].original_model, 0.01);
    }
}
