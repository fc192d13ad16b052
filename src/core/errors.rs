//! TPR-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, TenureError>;

/// Top-level error type for the tenure predictor.
#[derive(Debug, Error)]
pub enum TenureError {
    #[error("[TPR-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[TPR-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[TPR-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error(
        "[TPR-2001] {role} artifact not found at {path}: make sure '{model_file}' and '{scaler_file}' are deployed"
    )]
    ArtifactNotFound {
        role: &'static str,
        path: PathBuf,
        model_file: String,
        scaler_file: String,
    },

    #[error("[TPR-2002] failed to load {role} artifact {path}: {details}")]
    ArtifactLoadFailure {
        role: &'static str,
        path: PathBuf,
        details: String,
    },

    #[error("[TPR-3001] unknown category '{value}' for feature {feature}")]
    UnknownCategory {
        feature: &'static str,
        value: String,
    },

    #[error("[TPR-3002] feature schema mismatch: {details}")]
    SchemaMismatch { details: String },

    #[error("[TPR-3003] {field} = {value} is outside the allowed range {min}..={max}")]
    FieldOutOfRange {
        field: &'static str,
        value: f64,
        min: i64,
        max: i64,
    },

    #[error("[TPR-3004] form aborted before {field} was entered")]
    FormAborted { field: &'static str },

    #[error("[TPR-4001] scaler failure: {details}")]
    ScalerError {
        details: String,
        /// The min-max rescaled vector that was handed to the scaler.
        unscaled: Vec<f64>,
    },

    #[error("[TPR-4002] inference failure: {details}")]
    InferenceError { details: String },

    #[error("[TPR-5001] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[TPR-5002] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },
}

impl TenureError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "TPR-1001",
            Self::MissingConfig { .. } => "TPR-1002",
            Self::ConfigParse { .. } => "TPR-1003",
            Self::ArtifactNotFound { .. } => "TPR-2001",
            Self::ArtifactLoadFailure { .. } => "TPR-2002",
            Self::UnknownCategory { .. } => "TPR-3001",
            Self::SchemaMismatch { .. } => "TPR-3002",
            Self::FieldOutOfRange { .. } => "TPR-3003",
            Self::FormAborted { .. } => "TPR-3004",
            Self::ScalerError { .. } => "TPR-4001",
            Self::InferenceError { .. } => "TPR-4002",
            Self::Io { .. } => "TPR-5001",
            Self::Serialization { .. } => "TPR-5002",
        }
    }

    /// Whether the failure happens before any form can be rendered.
    ///
    /// Everything else only halts the current submission.
    #[must_use]
    pub const fn halts_startup(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::MissingConfig { .. }
                | Self::ConfigParse { .. }
                | Self::ArtifactNotFound { .. }
                | Self::ArtifactLoadFailure { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Convenience constructor for schema mismatches.
    #[must_use]
    pub fn schema(details: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            details: details.into(),
        }
    }
}

impl From<serde_json::Error> for TenureError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for TenureError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
