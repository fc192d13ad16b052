//! Inference side: artifact loading, the scaler/regressor capability seams,
//! and the predictor that chains them.

pub mod artifacts;
pub mod predictor;
pub mod regressor;
pub mod scaler;

use crate::core::errors::Result;

pub use artifacts::{ArtifactInfo, ArtifactPaths, LoadedArtifacts, load_artifacts};
pub use predictor::Predictor;
pub use regressor::ModelArtifact;
pub use scaler::StandardScaler;

/// Fitted feature standardization.
pub trait Scaler {
    /// Map one encoded vector into the space the model was trained in.
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>>;
}

/// Fitted regression model producing one normalized scalar per row.
pub trait Regressor {
    /// Predict a single row.
    fn predict(&self, features: &[f64]) -> Result<f64>;
}
