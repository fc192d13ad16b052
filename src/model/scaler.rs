//! Standard scaler exported by the training pipeline.

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, TenureError};
use crate::features::{FEATURE_COUNT, FEATURE_ORDER};

use super::Scaler;

/// Scaler families the exporter can emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerKind {
    /// Zero mean, unit variance.
    #[default]
    StandardScaler,
}

/// `(x - mean) / scale`, per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandardScaler {
    /// Artifact family tag.
    pub kind: ScalerKind,
    /// Per-column fitted mean.
    pub mean: Vec<f64>,
    /// Per-column fitted standard deviation. Zero entries divide by one.
    pub scale: Vec<f64>,
    /// Column names seen at fit time, if the exporter recorded them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    /// Check the artifact against the fitted column layout.
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {FEATURE_COUNT} columns, artifact has mean={} scale={}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if let Some(index) = self
            .mean
            .iter()
            .chain(&self.scale)
            .position(|value| !value.is_finite())
        {
            return Err(format!("non-finite parameter at position {index}"));
        }
        if let Some(names) = &self.feature_names {
            let expected: Vec<&str> = FEATURE_ORDER.iter().map(|f| f.column()).collect();
            if names.iter().map(String::as_str).ne(expected.iter().copied()) {
                return Err(format!(
                    "fitted column order {names:?} does not match {expected:?}"
                ));
            }
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.mean.len() || features.len() != self.scale.len() {
            return Err(TenureError::ScalerError {
                details: format!(
                    "input has {} columns but the scaler was fitted on {}",
                    features.len(),
                    self.mean.len()
                ),
                unscaled: features.to_vec(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| {
                let divisor = if *scale == 0.0 { 1.0 } else { *scale };
                (value - mean) / divisor
            })
            .collect())
    }
}
