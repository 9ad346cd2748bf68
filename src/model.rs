//! Model accessor
//!
//! Uniform read-only adapter over an opaque trained-model handle. The
//! analyzer depends only on the [`ModelHandler`] and [`Predictor`]
//! traits, never on a concrete model backend.
use crate::data::{DataFrame, FeatureRole, FeatureSpec};
use crate::errors::DriftError;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Kind of prediction the wrapped model produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionType {
    Regression,
    BinaryClassification,
    Multiclass,
}

/// Predictions of the production model on a dataframe.
///
/// For classifiers this carries a class label per row and a per-class
/// probability row aligned with `classes`. Regression models leave
/// `classes` empty and put the predicted value in `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionFrame {
    /// The model's ordered class list; empty for regression.
    pub classes: Vec<String>,
    /// Predicted class label per row; empty for regression.
    pub labels: Vec<String>,
    /// Per-class probabilities, one row per input row.
    pub probas: Vec<Vec<f64>>,
    /// Predicted values for regression models.
    pub values: Vec<f64>,
}

impl PredictionFrame {
    /// Number of predicted rows.
    pub fn n_rows(&self) -> usize {
        if self.labels.is_empty() {
            self.values.len()
        } else {
            self.labels.len()
        }
    }
}

/// Callable surface of a trained model.
pub trait Predictor {
    /// Ordered names of the features the model consumes.
    fn features(&self) -> Vec<String>;

    /// Predict every row of the given dataframe.
    ///
    /// The predictor is responsible for selecting its own feature
    /// columns and applying its own missing-value policy.
    fn predict(&self, df: &DataFrame) -> Result<PredictionFrame, DriftError>;

    /// Model-reported non-negative importance score per feature.
    fn feature_importance(&self) -> HashMap<String, f64>;
}

/// Backend seam: everything the analyzer needs to know about one
/// trained model version.
pub trait ModelHandler {
    /// Kind of prediction the model produces.
    fn prediction_type(&self) -> PredictionType;

    /// The model's predictor, if it has a usable one.
    fn predictor(&self) -> Option<&dyn Predictor>;

    /// Name of the target column, if the model is supervised.
    fn target_variable(&self) -> Option<String>;

    /// Held-out evaluation dataframe and whether it carries the target.
    fn test_df(&self) -> (DataFrame, bool);

    /// Ordered per-feature configuration, including non-input columns.
    fn per_feature(&self) -> Vec<(String, FeatureSpec)>;
}

/// Read-only accessor over a [`ModelHandler`].
///
/// Every call is a pure read over the wrapped handle; the accessor
/// holds no state of its own.
pub struct ModelAccessor {
    handler: Box<dyn ModelHandler>,
}

impl ModelAccessor {
    pub fn new(handler: Box<dyn ModelHandler>) -> Self {
        ModelAccessor { handler }
    }

    /// Target column name, or `None` for prediction-only models.
    pub fn get_target_variable(&self) -> Option<String> {
        self.handler.target_variable()
    }

    /// Ordered names of the features the model actually uses as input.
    pub fn get_selected_features(&self) -> Vec<String> {
        self.handler
            .per_feature()
            .into_iter()
            .filter(|(_, spec)| spec.role == FeatureRole::Input)
            .map(|(name, _)| name)
            .collect()
    }

    /// The model's predictor.
    pub fn get_predictor(&self) -> Result<&dyn Predictor, DriftError> {
        self.handler.predictor().ok_or_else(|| {
            DriftError::UnsupportedModel("the model handle exposes no usable predictor".to_string())
        })
    }

    /// Importance score per feature, as reported by the model.
    pub fn get_feature_importance(&self) -> Result<HashMap<String, f64>, DriftError> {
        Ok(self.get_predictor()?.feature_importance())
    }

    /// Held-out evaluation dataframe and whether it carries the target.
    pub fn get_test_df(&self) -> (DataFrame, bool) {
        self.handler.test_df()
    }

    /// Kind of prediction the model produces.
    pub fn get_prediction_type(&self) -> PredictionType {
        self.handler.prediction_type()
    }
}
