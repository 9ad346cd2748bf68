//! Fugacity
//!
//! Per-class share of the production model's predictions, compared
//! between the reference dataset and the new dataset. Measures
//! predicted-output shift, which is complementary to the drift
//! classifier's input-separability accuracy.
use crate::data::DataFrame;
use crate::errors::DriftError;
use crate::metrics::round2;
use crate::model::Predictor;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Share of predictions falling into one class, on each dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FugacityRecord {
    pub class_label: String,
    /// Percentage of reference rows predicted into this class.
    pub reference_pct: f64,
    /// Percentage of new rows predicted into this class.
    pub new_pct: f64,
}

/// Compute per-class prediction shares with the production model's own
/// predictor. Classes follow the model's class ordering; percentages
/// for each dataset sum to 100 up to rounding.
pub fn compute_fugacity(
    predictor: &dyn Predictor,
    reference_df: &DataFrame,
    new_df: &DataFrame,
) -> Result<Vec<FugacityRecord>, DriftError> {
    let reference_pred = predictor.predict(reference_df)?;
    let new_pred = predictor.predict(new_df)?;

    let reference_share = label_shares(&reference_pred.labels);
    let new_share = label_shares(&new_pred.labels);

    Ok(reference_pred
        .classes
        .iter()
        .map(|class| FugacityRecord {
            class_label: class.clone(),
            reference_pct: round2(reference_share.get(class).copied().unwrap_or(0.0)),
            new_pct: round2(new_share.get(class).copied().unwrap_or(0.0)),
        })
        .collect())
}

fn label_shares(labels: &[String]) -> HashMap<String, f64> {
    let mut counts: HashMap<&String, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let n = labels.len() as f64;
    counts
        .into_iter()
        .map(|(label, count)| (label.clone(), 100.0 * count as f64 / n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PredictionFrame;

    /// Predicts "low" below 10, "high" at or above, never "unused".
    struct ThresholdPredictor;

    impl Predictor for ThresholdPredictor {
        fn features(&self) -> Vec<String> {
            vec!["x".to_string()]
        }

        fn predict(&self, df: &DataFrame) -> Result<PredictionFrame, DriftError> {
            let classes = vec!["low".to_string(), "high".to_string(), "unused".to_string()];
            let labels: Vec<String> = df
                .column("x")
                .ok_or_else(|| DriftError::MissingFeature("x".to_string()))?
                .iter()
                .map(|&v| if v < 10.0 { "low".to_string() } else { "high".to_string() })
                .collect();
            let probas = labels
                .iter()
                .map(|l| classes.iter().map(|c| f64::from(u8::from(c == l))).collect())
                .collect();
            Ok(PredictionFrame {
                classes,
                labels,
                probas,
                values: Vec::new(),
            })
        }

        fn feature_importance(&self) -> HashMap<String, f64> {
            [("x".to_string(), 1.0)].into_iter().collect()
        }
    }

    fn frame(values: Vec<f64>) -> DataFrame {
        DataFrame::from_columns(vec![("x".to_string(), values)])
    }

    #[test]
    fn test_fugacity_shares_and_ordering() {
        let reference = frame(vec![1.0, 2.0, 3.0, 20.0]);
        let new = frame(vec![15.0, 16.0, 17.0]);

        let records = compute_fugacity(&ThresholdPredictor, &reference, &new).unwrap();
        let labels: Vec<&str> = records.iter().map(|r| r.class_label.as_str()).collect();
        assert_eq!(labels, vec!["low", "high", "unused"]);

        assert_eq!(records[0].reference_pct, 75.0);
        assert_eq!(records[1].reference_pct, 25.0);
        assert_eq!(records[2].reference_pct, 0.0);

        assert_eq!(records[0].new_pct, 0.0);
        assert_eq!(records[1].new_pct, 100.0);
    }

    #[test]
    fn test_fugacity_sums_to_100() {
        let reference = frame((0..9).map(|i| i as f64 * 3.0).collect());
        let new = frame((0..7).map(|i| i as f64 * 5.0).collect());

        let records = compute_fugacity(&ThresholdPredictor, &reference, &new).unwrap();
        let reference_total: f64 = records.iter().map(|r| r.reference_pct).sum();
        let new_total: f64 = records.iter().map(|r| r.new_pct).sum();
        approx::assert_abs_diff_eq!(reference_total, 100.0, epsilon = 0.1);
        approx::assert_abs_diff_eq!(new_total, 100.0, epsilon = 0.1);
    }
}
