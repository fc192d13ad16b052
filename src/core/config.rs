//! TOML configuration: artifact locations, optional digest pins, event log,
//! and display preferences.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, TenureError};
use crate::model::ArtifactPaths;
use crate::model::artifacts::{DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE};

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tenure.toml";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub artifacts: ArtifactConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactConfig {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub model_sha256: Option<String>,
    pub scaler_sha256: Option<String>,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_FILE),
            scaler_path: PathBuf::from(DEFAULT_SCALER_FILE),
            model_sha256: None,
            scaler_sha256: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Append-only JSONL event log. Absent disables logging.
    pub jsonl_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `tenure.toml` in the working
    /// directory is used when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(TenureError::MissingConfig {
                        path: path.to_path_buf(),
                    });
                }
                path.to_path_buf()
            }
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let raw = std::fs::read_to_string(&path).map_err(|err| TenureError::io(&path, err))?;
        let config = Self::from_toml_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Reject values that cannot work regardless of the filesystem.
    pub fn validate(&self) -> Result<()> {
        let artifacts = &self.artifacts;
        for (name, path) in [
            ("artifacts.model_path", &artifacts.model_path),
            ("artifacts.scaler_path", &artifacts.scaler_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(TenureError::InvalidConfig {
                    details: format!("{name} must not be empty"),
                });
            }
        }
        for (name, digest) in [
            ("artifacts.model_sha256", &artifacts.model_sha256),
            ("artifacts.scaler_sha256", &artifacts.scaler_sha256),
        ] {
            if let Some(digest) = digest {
                if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(TenureError::InvalidConfig {
                        details: format!("{name} must be 64 hex characters"),
                    });
                }
            }
        }
        if let Some(path) = &self.logging.jsonl_path {
            if path.as_os_str().is_empty() {
                return Err(TenureError::InvalidConfig {
                    details: "logging.jsonl_path must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Artifact locations for the loader.
    #[must_use]
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.artifacts.model_path.clone(),
            scaler: self.artifacts.scaler_path.clone(),
            model_sha256: self.artifacts.model_sha256.clone(),
            scaler_sha256: self.artifacts.scaler_sha256.clone(),
        }
    }
}
