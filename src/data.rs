//! Data containers
//!
//! The owned, named-column dataframe the analyzer operates on, plus the
//! per-feature configuration structures consumed by the model accessor.
use crate::errors::DriftError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Role a column plays for the wrapped model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureRole {
    /// An input feature used by the model at prediction time.
    Input,
    /// The target variable the model was trained against.
    Target,
    /// A column the model ignores entirely.
    Reject,
}

/// Declared value type of a feature column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    Numeric,
    Category,
}

/// How the model handles missing values for a feature at prediction time.
///
/// The analyzer itself never imputes; this is carried as read-only model
/// metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingHandling {
    Impute,
    DropRows,
    Fail,
}

/// Per-feature configuration as reported by the model backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub role: FeatureRole,
    pub feature_type: FeatureType,
    pub missing: MissingHandling,
}

impl FeatureSpec {
    /// Spec for a numeric input feature with imputed missing values.
    pub fn input() -> Self {
        FeatureSpec {
            role: FeatureRole::Input,
            feature_type: FeatureType::Numeric,
            missing: MissingHandling::Impute,
        }
    }

    /// Spec for the target column.
    pub fn target() -> Self {
        FeatureSpec {
            role: FeatureRole::Target,
            feature_type: FeatureType::Numeric,
            missing: MissingHandling::Fail,
        }
    }
}

/// Owned column-major dataframe of `f64` values with named columns.
///
/// `NaN` encodes a missing value. Column order is preserved and
/// meaningful; all columns have the same number of rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    rows: usize,
}

impl DataFrame {
    /// Create an empty dataframe with no rows and no columns.
    pub fn new() -> Self {
        DataFrame::default()
    }

    /// Build a dataframe from ordered `(name, values)` pairs.
    ///
    /// All columns must have the same length, and names must be unique.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Self {
        let rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            assert_eq!(values.len(), rows, "All columns must have the same length");
            assert!(!names.contains(&name), "Duplicate column name: {}", name);
            names.push(name);
            data.push(values);
        }
        DataFrame {
            names,
            columns: data,
            rows,
        }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// True when the frame has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns.is_empty()
    }

    /// Ordered column names.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// A column's values by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.column_index(name).map(|i| self.columns[i].as_slice())
    }

    /// A column's values by position.
    pub fn column_at(&self, col: usize) -> &[f64] {
        &self.columns[col]
    }

    /// A single value.
    ///
    /// * `row` - The row of the value to get.
    /// * `col` - The column of the value to get.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.columns[col][row]
    }

    /// Restrict the frame to the named columns, in the given order.
    ///
    /// Fails naming the first column that is absent.
    pub fn select(&self, names: &[String]) -> Result<DataFrame, DriftError> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            match self.column(name) {
                Some(values) => columns.push((name.clone(), values.to_vec())),
                None => return Err(DriftError::MissingFeature(name.clone())),
            }
        }
        Ok(DataFrame::from_columns(columns))
    }

    /// Drop the named columns; names not present are ignored.
    pub fn drop_columns(&self, names: &[&str]) -> DataFrame {
        let kept: Vec<(String, Vec<f64>)> = self
            .names
            .iter()
            .zip(self.columns.iter())
            .filter(|(n, _)| !names.contains(&n.as_str()))
            .map(|(n, v)| (n.clone(), v.clone()))
            .collect();
        DataFrame::from_columns(kept)
    }

    /// New frame containing the given rows, in the given order.
    pub fn take(&self, indices: &[usize]) -> DataFrame {
        let columns = self
            .names
            .iter()
            .zip(self.columns.iter())
            .map(|(n, v)| (n.clone(), indices.iter().map(|&i| v[i]).collect()))
            .collect();
        DataFrame::from_columns(columns)
    }

    /// Simple random sample of `n` rows without replacement.
    ///
    /// Returns the frame unchanged when `n` covers every row, so that a
    /// no-op sample does not reorder the data.
    pub fn sample_rows(&self, n: usize, rng: &mut StdRng) -> DataFrame {
        if n >= self.rows {
            return self.clone();
        }
        let mut index: Vec<usize> = (0..self.rows).collect();
        index.shuffle(rng);
        index.truncate(n);
        self.take(&index)
    }

    /// Stack another frame below this one. Column sets must match.
    pub fn vstack(&self, other: &DataFrame) -> DataFrame {
        assert_eq!(self.names, other.names, "Column sets must match to vstack");
        let columns = self
            .names
            .iter()
            .zip(self.columns.iter())
            .zip(other.columns.iter())
            .map(|((n, a), b)| {
                let mut v = a.clone();
                v.extend_from_slice(b);
                (n.clone(), v)
            })
            .collect();
        DataFrame::from_columns(columns)
    }
}
