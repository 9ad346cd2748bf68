//! Drift analyzer
//!
//! Orchestrates schema validation, drift classifier training, feature
//! importance comparison, and fugacity computation into a single
//! `fit` → metrics-retrieval workflow.
use crate::data::DataFrame;
use crate::errors::DriftError;
use crate::forest::BaggedTrees;
use crate::fugacity::{compute_fugacity, FugacityRecord};
use crate::importance::{compare_importance, FeatureImportanceRecord};
use crate::metrics::{rescale_accuracy, ScoreFn};
use crate::model::{ModelAccessor, PredictionType};
use crate::trainer::{train_drift_classifier, TrainerConfig};
use crate::validation::check_dataframe;
use log::info;
use serde::Serialize;

/// Tuning knobs for one analyzer instance.
#[derive(Debug, Clone, Copy)]
pub struct DriftAnalyzerConfig {
    /// Seed for every random draw: capping, balancing, splitting, and
    /// tree bootstraps.
    pub seed: u64,
    /// Share of the balanced sample held out to evaluate the drift
    /// classifier.
    pub test_ratio: f64,
    /// Trees in the bagged drift classifier.
    pub n_trees: usize,
    /// Depth cap of each tree.
    pub max_depth: usize,
    /// Row cap applied to each dataset before balancing.
    pub max_rows: usize,
    /// Map from drift accuracy to the headline drift score.
    pub score_fn: ScoreFn,
}

impl Default for DriftAnalyzerConfig {
    fn default() -> Self {
        DriftAnalyzerConfig {
            seed: 65537,
            test_ratio: 0.3,
            n_trees: 50,
            max_depth: 10,
            max_rows: 100_000,
            score_fn: rescale_accuracy,
        }
    }
}

/// Aggregate result of one successful `fit`. Immutable once built;
/// replaced wholesale by a re-fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftMetrics {
    /// Held-out accuracy of the drift classifier.
    pub drift_accuracy: f64,
    /// Headline scalar derived from `drift_accuracy`.
    pub drift_score: f64,
    /// Per-feature importance under both models, name-ordered.
    pub feature_importance: Vec<FeatureImportanceRecord>,
    /// Per-class prediction shares on both datasets; empty for
    /// regression models.
    pub fugacity: Vec<FugacityRecord>,
}

struct FittedState {
    classifier: BaggedTrees,
    metrics: DriftMetrics,
}

/// Detects whether a new dataset has drifted away from the data a
/// production model was validated on.
///
/// One analyzer instance serves one drift check at a time; it holds no
/// state across `fit` calls except the most recent results.
#[derive(Default)]
pub struct DriftAnalyzer {
    config: DriftAnalyzerConfig,
    fitted: Option<FittedState>,
}

impl DriftAnalyzer {
    pub fn new() -> Self {
        DriftAnalyzer::default()
    }

    pub fn with_config(config: DriftAnalyzerConfig) -> Self {
        DriftAnalyzer { config, fitted: None }
    }

    /// Analyze the drift of `new_df` against the model's held-out data.
    ///
    /// Fails fast on the first error; a failed re-fit keeps the
    /// previous fitted state, so partial metrics are never exposed.
    pub fn fit(&mut self, new_df: &DataFrame, model_accessor: &ModelAccessor) -> Result<(), DriftError> {
        let features = model_accessor.get_selected_features();
        check_dataframe(new_df, &features)?;

        let (reference_df, _has_target) = model_accessor.get_test_df();
        info!(
            "Analyzing drift of {} new rows against {} reference rows over {} features",
            new_df.n_rows(),
            reference_df.n_rows(),
            features.len()
        );

        let trainer_config = TrainerConfig {
            seed: self.config.seed,
            test_ratio: self.config.test_ratio,
            n_trees: self.config.n_trees,
            max_depth: self.config.max_depth,
            max_rows: self.config.max_rows,
        };
        let trained = train_drift_classifier(&reference_df, new_df, &features, &trainer_config)?;

        let predictor = model_accessor.get_predictor()?;
        let original_importance = model_accessor.get_feature_importance()?;
        let drift_importance = trained.classifier.feature_importance(&features);
        let feature_importance = compare_importance(&original_importance, &drift_importance);

        let fugacity = match model_accessor.get_prediction_type() {
            PredictionType::Regression => Vec::new(),
            PredictionType::BinaryClassification | PredictionType::Multiclass => {
                compute_fugacity(predictor, &reference_df, new_df)?
            }
        };

        let drift_score = (self.config.score_fn)(trained.drift_accuracy);
        info!(
            "Drift analysis done: accuracy {:.4}, score {:.4}",
            trained.drift_accuracy, drift_score
        );

        self.fitted = Some(FittedState {
            classifier: trained.classifier,
            metrics: DriftMetrics {
                drift_accuracy: trained.drift_accuracy,
                drift_score,
                feature_importance,
                fugacity,
            },
        });
        Ok(())
    }

    /// The headline drift score of the last successful `fit`.
    pub fn get_drift_score(&self) -> Result<f64, DriftError> {
        Ok(self.get_drift_metrics()?.drift_score)
    }

    /// All metrics of the last successful `fit`.
    pub fn get_drift_metrics(&self) -> Result<&DriftMetrics, DriftError> {
        self.fitted
            .as_ref()
            .map(|state| &state.metrics)
            .ok_or(DriftError::NotFitted)
    }

    /// The fitted drift classifier of the last successful `fit`.
    pub fn get_drift_classifier(&self) -> Result<&BaggedTrees, DriftError> {
        self.fitted
            .as_ref()
            .map(|state| &state.classifier)
            .ok_or(DriftError::NotFitted)
    }

    /// Metrics of the last successful `fit` as a JSON payload.
    pub fn get_drift_metrics_for_webapp(&self) -> Result<serde_json::Value, DriftError> {
        Ok(serde_json::to_value(self.get_drift_metrics()?)?)
    }
}
