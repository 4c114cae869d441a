//! Gradient-boosted decision trees for binary classification.
//!
//! This mirrors the layout XGBoost exports for `binary:logistic`: every tree contributes a leaf
//! value to a shared margin, and the margin goes through the logistic link.

mod model;

pub use model::{GbdtModel, Node, Tree};
