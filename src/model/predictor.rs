//! Standardize-then-infer for a single encoded record.

use crate::core::errors::{Result, TenureError};
use crate::features::FeatureVector;

use super::{Regressor, Scaler};

/// Borrowed scaler and model, applied in that order.
pub struct Predictor<'a> {
    scaler: &'a dyn Scaler,
    model: &'a dyn Regressor,
}

impl<'a> Predictor<'a> {
    /// Pair a scaler with the model it was fitted for.
    #[must_use]
    pub fn new(scaler: &'a dyn Scaler, model: &'a dyn Regressor) -> Self {
        Self { scaler, model }
    }

    /// One record in, one normalized scalar out.
    ///
    /// A scaler failure always carries the unscaled vector so the operator can
    /// see what was submitted.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let unscaled = features.as_slice();
        let standardized = self.scaler.transform(unscaled).map_err(|err| match err {
            TenureError::ScalerError { details, .. } => TenureError::ScalerError {
                details,
                unscaled: unscaled.to_vec(),
            },
            other => TenureError::ScalerError {
                details: other.to_string(),
                unscaled: unscaled.to_vec(),
            },
        })?;
        self.model.predict(&standardized).map_err(|err| match err {
            TenureError::InferenceError { .. } => err,
            other => TenureError::InferenceError {
                details: other.to_string(),
            },
        })
    }
}
