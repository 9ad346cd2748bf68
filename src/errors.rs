//! Errors
//!
//! Custom error types used throughout the `driftcheck` crate.
use thiserror::Error;

/// Errors that can occur while analyzing a dataset for drift.
///
/// Every error is terminal for the current `fit` or query call; the
/// crate performs no internal retries.
#[derive(Debug, Error)]
pub enum DriftError {
    /// The candidate dataset has no rows or no columns.
    #[error("Dataset is empty, nothing to analyze.")]
    EmptyDataset,
    /// A feature required by the model is absent from the dataset.
    #[error("Feature '{0}' is required by the model but missing from the dataset.")]
    MissingFeature(String),
    /// One of the compared sets has no rows after feature restriction.
    #[error("Not enough data to train the drift classifier: {0}")]
    InsufficientData(String),
    /// Drift classifier training would be degenerate.
    #[error("Drift classifier training failed: {0}")]
    DriftFit(String),
    /// Metrics were requested before a successful `fit`.
    #[error("Drift metrics requested before a successful fit.")]
    NotFitted,
    /// The wrapped model exposes no usable predictor or importances.
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),
    /// Metrics could not be serialized for the webapp payload.
    #[error("Unable to serialize drift metrics: {0}")]
    Serialization(#[from] serde_json::Error),
}
