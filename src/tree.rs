//! Decision tree
//!
//! Greedy CART classifier on Gini impurity, used as the base learner
//! of the bagged drift classifier. Binary labels only: 0 marks a
//! reference row, 1 marks a new row.
use crate::data::DataFrame;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

const MIN_GAIN: f64 = 1e-12;

/// One node of a fitted tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal split. Rows with a missing value for the split feature
    /// go to the left child.
    Split {
        feature: usize,
        threshold: f64,
        /// Impurity decrease of this split, weighted by node size.
        gain: f64,
        left: usize,
        right: usize,
    },
    /// Terminal node carrying the fraction of label-1 rows it saw.
    Leaf { positive_fraction: f64 },
}

/// A single CART decision tree over binary labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
    max_depth: usize,
    min_samples_split: usize,
}

/// Gini impurity of a node with `pos` positive rows out of `n`.
pub fn gini(pos: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = pos as f64 / n as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl DecisionTree {
    pub fn new(max_depth: usize, min_samples_split: usize) -> Self {
        DecisionTree {
            nodes: Vec::new(),
            max_depth,
            min_samples_split,
        }
    }

    /// Fit the tree on the rows of `df` named by `index`.
    ///
    /// * `df` - Feature dataframe of the training set.
    /// * `y` - Binary label per row of `df`.
    /// * `index` - Rows to fit on; duplicates are allowed, which is how
    ///   the ensemble passes bootstrap resamples in.
    pub fn fit(&mut self, df: &DataFrame, y: &[u8], index: Vec<usize>) {
        self.nodes.clear();
        self.grow(df, y, index, 0);
    }

    fn grow(&mut self, df: &DataFrame, y: &[u8], index: Vec<usize>, depth: usize) -> usize {
        let n = index.len();
        let pos = index.iter().filter(|&&i| y[i] == 1).count();

        let as_leaf = depth >= self.max_depth || n < self.min_samples_split || pos == 0 || pos == n;
        let split = if as_leaf { None } else { self.best_split(df, y, &index) };

        match split {
            None => {
                self.nodes.push(TreeNode::Leaf {
                    positive_fraction: pos as f64 / n as f64,
                });
                self.nodes.len() - 1
            }
            Some(s) => {
                let (left_index, right_index): (Vec<usize>, Vec<usize>) = index.into_iter().partition(|&i| {
                    let v = df.get(i, s.feature);
                    v.is_nan() || v <= s.threshold
                });
                // Reserve the slot so child ids are known relative to it.
                let node_id = self.nodes.len();
                self.nodes.push(TreeNode::Leaf { positive_fraction: 0.0 });
                let left = self.grow(df, y, left_index, depth + 1);
                let right = self.grow(df, y, right_index, depth + 1);
                self.nodes[node_id] = TreeNode::Split {
                    feature: s.feature,
                    threshold: s.threshold,
                    gain: s.gain,
                    left,
                    right,
                };
                node_id
            }
        }
    }

    /// Exhaustive scan over features and candidate thresholds for the
    /// split with the largest Gini gain. Deterministic: features are
    /// visited in column order and only a strictly larger gain replaces
    /// the current best.
    fn best_split(&self, df: &DataFrame, y: &[u8], index: &[usize]) -> Option<BestSplit> {
        let n = index.len();
        let total_pos = index.iter().filter(|&&i| y[i] == 1).count();
        let parent_impurity = n as f64 * gini(total_pos, n);

        let mut best: Option<BestSplit> = None;
        for feature in 0..df.n_cols() {
            let column = df.column_at(feature);

            // Missing values always travel left, so they join the left
            // counts before any threshold is considered.
            let mut nan_n = 0;
            let mut nan_pos = 0;
            let mut valued: Vec<(f64, u8)> = Vec::with_capacity(n);
            for &i in index {
                let v = column[i];
                if v.is_nan() {
                    nan_n += 1;
                    nan_pos += usize::from(y[i] == 1);
                } else {
                    valued.push((v, y[i]));
                }
            }
            if valued.len() < 2 {
                continue;
            }
            valued.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_n = nan_n;
            let mut left_pos = nan_pos;
            for k in 0..valued.len() - 1 {
                left_n += 1;
                left_pos += usize::from(valued[k].1 == 1);
                if valued[k].0 == valued[k + 1].0 {
                    continue;
                }
                let right_n = n - left_n;
                let right_pos = total_pos - left_pos;
                let children_impurity =
                    left_n as f64 * gini(left_pos, left_n) + right_n as f64 * gini(right_pos, right_n);
                let gain = parent_impurity - children_impurity;
                if gain > MIN_GAIN && best.as_ref().map(|b| gain > b.gain).unwrap_or(true) {
                    best = Some(BestSplit {
                        feature,
                        threshold: (valued[k].0 + valued[k + 1].0) / 2.0,
                        gain,
                    });
                }
            }
        }
        best
    }

    /// Fraction of label-1 training rows in the leaf this row falls into.
    pub fn predict_row(&self, df: &DataFrame, row: usize) -> f64 {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                TreeNode::Leaf { positive_fraction } => return *positive_fraction,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    let v = df.get(row, *feature);
                    node = if v.is_nan() || v <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Accumulate each feature's total split gain into `stats`.
    pub fn accumulate_importance(&self, stats: &mut HashMap<usize, f64>) {
        for node in &self.nodes {
            if let TreeNode::Split { feature, gain, .. } = node {
                *stats.entry(*feature).or_insert(0.0) += gain;
            }
        }
    }
}
