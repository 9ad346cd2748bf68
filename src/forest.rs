//! Bagged tree ensemble
//!
//! The drift classifier: an ensemble of decision trees, each fit on a
//! bootstrap resample of the training set. Trees are trained in
//! parallel over pre-derived per-tree seeds, so the fitted ensemble is
//! identical run to run for a given seed.
use crate::data::DataFrame;
use crate::tree::DecisionTree;
use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Bagged binary classifier over decision trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaggedTrees {
    pub trees: Vec<DecisionTree>,
    n_trees: usize,
    max_depth: usize,
    seed: u64,
}

impl BaggedTrees {
    pub fn new(n_trees: usize, max_depth: usize, seed: u64) -> Self {
        BaggedTrees {
            trees: Vec::new(),
            n_trees,
            max_depth,
            seed,
        }
    }

    /// Fit the ensemble on a training dataframe and its binary labels.
    pub fn fit(&mut self, df: &DataFrame, y: &[u8]) {
        assert_eq!(df.n_rows(), y.len(), "Labels must align with rows");
        let n = df.n_rows();
        let seeds: Vec<u64> = (0..self.n_trees as u64)
            .map(|i| self.seed.wrapping_add(i.wrapping_mul(0x9E3779B97F4A7C15)))
            .collect();
        let max_depth = self.max_depth;
        self.trees = seeds
            .par_iter()
            .map(|&tree_seed| {
                let mut rng = StdRng::seed_from_u64(tree_seed);
                let index: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let mut tree = DecisionTree::new(max_depth, 2);
                tree.fit(df, y, index);
                tree
            })
            .collect();
    }

    /// Mean leaf positive-fraction across trees, per row.
    pub fn predict_proba(&self, df: &DataFrame) -> Vec<f64> {
        let n_trees = self.trees.len() as f64;
        (0..df.n_rows())
            .map(|row| {
                let total: f64 = self.trees.iter().map(|t| t.predict_row(df, row)).sum();
                total / n_trees
            })
            .collect()
    }

    /// Predicted label per row. Ties resolve to class 0.
    pub fn predict(&self, df: &DataFrame) -> Vec<u8> {
        self.predict_proba(df)
            .into_iter()
            .map(|p| u8::from(p > 0.5))
            .collect()
    }

    /// Total split gain per feature across all trees, normalized to
    /// percentages of the ensemble's total gain.
    ///
    /// * `feature_names` - Column names of the training dataframe, in
    ///   training order.
    pub fn feature_importance(&self, feature_names: &[String]) -> HashMap<String, f64> {
        let mut stats: HashMap<usize, f64> = HashMap::new();
        for tree in &self.trees {
            tree.accumulate_importance(&mut stats);
        }

        // Sum in sorted order so floating point error cannot make the
        // normalization run-dependent.
        let mut values: Vec<f64> = stats.values().copied().collect();
        values.sort_by(|a, b| a.total_cmp(b));
        let total: f64 = values.iter().sum();

        feature_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let gain = stats.get(&i).copied().unwrap_or(0.0);
                let pct = if total > 0.0 { 100.0 * gain / total } else { 0.0 };
                (name.clone(), pct)
            })
            .collect()
    }
}
