//! Startup loading of the fitted scaler and model.
//!
//! Both files are read once, fingerprinted, parsed, and validated. Anything
//! short of a clean load is fatal: the caller must not render a form.

#![allow(missing_docs)]

use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::core::errors::{Result, TenureError};

use super::predictor::Predictor;
use super::regressor::ModelArtifact;
use super::scaler::StandardScaler;

/// Default model file name, relative to the working directory.
pub const DEFAULT_MODEL_FILE: &str = "gradient_boosting_regressor_model.json";
/// Default scaler file name, relative to the working directory.
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";

/// Where to find the artifacts and, optionally, what they must hash to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub model_sha256: Option<String>,
    pub scaler_sha256: Option<String>,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_FILE),
            scaler: PathBuf::from(DEFAULT_SCALER_FILE),
            model_sha256: None,
            scaler_sha256: None,
        }
    }
}

/// Provenance of one loaded artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactInfo {
    pub role: &'static str,
    pub path: PathBuf,
    pub bytes: u64,
    pub sha256: String,
}

/// Both artifacts, held read-only for the rest of the process.
#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    pub scaler: StandardScaler,
    pub model: ModelArtifact,
    pub scaler_info: ArtifactInfo,
    pub model_info: ArtifactInfo,
}

impl LoadedArtifacts {
    /// Predictor borrowing both artifacts.
    #[must_use]
    pub fn predictor(&self) -> Predictor<'_> {
        Predictor::new(&self.scaler, &self.model)
    }
}

/// Load the scaler, then the model.
pub fn load_artifacts(paths: &ArtifactPaths) -> Result<LoadedArtifacts> {
    let (scaler, scaler_info): (StandardScaler, _) =
        load_one("scaler", &paths.scaler, paths.scaler_sha256.as_deref(), paths)?;
    scaler
        .validate()
        .map_err(|details| load_failure("scaler", &paths.scaler, details))?;

    let (model, model_info): (ModelArtifact, _) =
        load_one("model", &paths.model, paths.model_sha256.as_deref(), paths)?;
    model
        .validate()
        .map_err(|details| load_failure("model", &paths.model, details))?;

    Ok(LoadedArtifacts {
        scaler,
        model,
        scaler_info,
        model_info,
    })
}

fn load_one<T: DeserializeOwned>(
    role: &'static str,
    path: &Path,
    expected_sha256: Option<&str>,
    paths: &ArtifactPaths,
) -> Result<(T, ArtifactInfo)> {
    let bytes = std::fs::read(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            TenureError::ArtifactNotFound {
                role,
                path: path.to_path_buf(),
                model_file: paths.model.display().to_string(),
                scaler_file: paths.scaler.display().to_string(),
            }
        } else {
            load_failure(role, path, err.to_string())
        }
    })?;

    let sha256 = sha256_hex(&bytes);
    if let Some(expected) = expected_sha256 {
        if !expected.eq_ignore_ascii_case(&sha256) {
            return Err(load_failure(
                role,
                path,
                format!("sha256 mismatch: expected {expected}, found {sha256}"),
            ));
        }
    }

    let parsed = serde_json::from_slice::<T>(&bytes)
        .map_err(|err| load_failure(role, path, err.to_string()))?;

    let info = ArtifactInfo {
        role,
        path: path.to_path_buf(),
        bytes: bytes.len() as u64,
        sha256,
    };
    Ok((parsed, info))
}

fn load_failure(role: &'static str, path: &Path, details: String) -> TenureError {
    TenureError::ArtifactLoadFailure {
        role,
        path: path.to_path_buf(),
        details,
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
