use serde::{Deserialize, Serialize};

use crate::ml::ModelError;

/// One node of a regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Internal node. Rows with `feature < threshold` go to `left`.
    Split {
        /// Feature index used for the split.
        feature: u16,
        /// Threshold in feature units.
        threshold: f32,
        /// Index of the left child within the tree's node list.
        left: u32,
        /// Index of the right child within the tree's node list.
        right: u32,
    },
    /// Terminal node contributing its value to the margin.
    Leaf(f32),
}

/// A regression tree stored as a flat node list rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Leaf value reached by `features`.
    ///
    /// The walk takes at most `nodes.len()` steps, so a cyclic tree that skipped
    /// validation scores `0.0` instead of looping.
    pub fn predict(&self, features: &[f32]) -> f32 {
        let mut idx = 0usize;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(Node::Leaf(value)) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features.get(*feature as usize).copied().unwrap_or(0.0);
                    let next = if value < *threshold { *left } else { *right };
                    idx = next as usize;
                }
                None => break,
            }
        }
        0.0
    }

    fn validate(&self, tree_idx: usize, feature_len: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid(format!("Tree {tree_idx} has no nodes")));
        }
        for (node_idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf(value) => {
                    if !value.is_finite() {
                        return Err(ModelError::Invalid(format!(
                            "Tree {tree_idx} node {node_idx} has a non-finite leaf"
                        )));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature as usize >= feature_len {
                        return Err(ModelError::Invalid(format!(
                            "Tree {tree_idx} node {node_idx} splits on feature {feature} but only {feature_len} exist"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::Invalid(format!(
                            "Tree {tree_idx} node {node_idx} has a non-finite threshold"
                        )));
                    }
                    for child in [*left, *right] {
                        let child = child as usize;
                        if child <= node_idx || child >= self.nodes.len() {
                            return Err(ModelError::Invalid(format!(
                                "Tree {tree_idx} node {node_idx} has invalid child {child}"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Boosted tree ensemble for binary classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbdtModel {
    /// Model format version.
    pub model_version: i64,
    /// Number of `f32` values per feature vector.
    pub feature_len: usize,
    /// Initial margin before any tree is applied.
    #[serde(default)]
    pub base_score: f32,
    /// Positive-class probability at or above which the label is `1`.
    #[serde(default = "crate::ml::default_threshold")]
    pub threshold: f32,
    pub trees: Vec<Tree>,
}

impl GbdtModel {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.feature_len == 0 {
            return Err(ModelError::Invalid("feature_len must be > 0".to_string()));
        }
        if !self.base_score.is_finite() {
            return Err(ModelError::Invalid("base_score must be finite".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("Model contains no trees".to_string()));
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate(tree_idx, self.feature_len)?;
        }
        Ok(())
    }

    /// Raw margin (log-odds) for a feature vector.
    pub fn predict_margin(&self, features: &[f32]) -> f32 {
        self.trees
            .iter()
            .fold(self.base_score, |acc, tree| acc + tree.predict(features))
    }
}
