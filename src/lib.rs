//! Label-free dataset drift detection.
//!
//! Trains an auxiliary "drift classifier" to discriminate a model's
//! held-out reference data from a newly arrived dataset; its held-out
//! accuracy is a proxy for how far the two distributions have moved
//! apart. Feature importance comparison and per-class fugacity give
//! the operator something interpretable next to the headline score.

// Modules
pub mod analyzer;
pub mod data;
pub mod errors;
pub mod forest;
pub mod fugacity;
pub mod importance;
pub mod metrics;
pub mod model;
pub mod trainer;
pub mod tree;
pub mod validation;

// Individual classes, and functions
pub use analyzer::{DriftAnalyzer, DriftAnalyzerConfig, DriftMetrics};
pub use data::DataFrame;
pub use errors::DriftError;
pub use model::ModelAccessor;
