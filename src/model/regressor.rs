//! Regression model artifacts: gradient-boosted trees and a linear fallback.
//!
//! Both predict the normalized tenure (years / 10) the model was trained on.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, TenureError};
use crate::features::FEATURE_COUNT;

use super::Regressor;

/// One node of a regression tree, stored in a flat array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Go `left` when `x[feature] <= threshold`, otherwise `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Flat-array regression tree. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Children must point forward in the array, which rules out cycles and
    /// bounds every walk by the node count.
    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {index} splits on feature {feature} of {n_features}"
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {index} has a NaN threshold"));
                    }
                    for child in [left, right] {
                        if *child <= index || *child >= self.nodes.len() {
                            return Err(format!("node {index} has invalid child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {index} is not finite"));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, features: &[f64]) -> Result<f64> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features.get(*feature).copied().ok_or_else(|| {
                        TenureError::InferenceError {
                            details: format!("tree reads missing feature {feature}"),
                        }
                    })?;
                    index = if value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(TenureError::InferenceError {
                        details: format!("tree walked to missing node {index}"),
                    });
                }
            }
        }
    }
}

/// Gradient-boosted regression trees: `init + learning_rate * sum(trees)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingModel {
    pub init: f64,
    pub learning_rate: f64,
    pub n_features: usize,
    pub trees: Vec<RegressionTree>,
}

impl GradientBoostingModel {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.n_features != FEATURE_COUNT {
            return Err(format!(
                "model was fitted on {} features, expected {FEATURE_COUNT}",
                self.n_features
            ));
        }
        if !self.init.is_finite() || !self.learning_rate.is_finite() {
            return Err("init and learning_rate must be finite".to_string());
        }
        if self.trees.is_empty() {
            return Err("ensemble has no trees".to_string());
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|err| format!("tree {index}: {err}"))?;
        }
        Ok(())
    }

    fn predict_row(&self, features: &[f64]) -> Result<f64> {
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.evaluate(features)?;
        }
        Ok(self.learning_rate.mul_add(sum, self.init))
    }
}

/// Ordinary linear model: `intercept + coefficients · x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {FEATURE_COUNT} coefficients, artifact has {}",
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("coefficients must be finite".to_string());
        }
        Ok(())
    }

    fn predict_row(&self, features: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (coef, value)| coef.mul_add(*value, acc))
    }
}

/// Model artifact as exported by the training pipeline, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    GradientBoosting(GradientBoostingModel),
    Linear(LinearModel),
}

impl ModelArtifact {
    /// Structural checks run once at load time.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            Self::GradientBoosting(model) => model.validate(),
            Self::Linear(model) => model.validate(),
        }
    }

    /// Short human-readable description for `check` output.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::GradientBoosting(model) => format!(
                "gradient boosting, {} trees, learning rate {}",
                model.trees.len(),
                model.learning_rate
            ),
            Self::Linear(model) => {
                format!("linear, {} coefficients", model.coefficients.len())
            }
        }
    }
}

impl Regressor for ModelArtifact {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != FEATURE_COUNT {
            return Err(TenureError::InferenceError {
                details: format!(
                    "expected {FEATURE_COUNT} standardized features, got {}",
                    features.len()
                ),
            });
        }
        let value = match self {
            Self::GradientBoosting(model) => model.predict_row(features)?,
            Self::Linear(model) => model.predict_row(features),
        };
        if !value.is_finite() {
            return Err(TenureError::InferenceError {
                details: format!("model produced non-finite output {value}"),
            });
        }
        Ok(value)
    }
}
