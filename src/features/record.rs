//! Raw feature record: one submission's named values before encoding.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::core::errors::{Result, TenureError};

use super::catalog::Feature;

/// An operator-entered value, before categorical encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Category(String),
}

impl RawValue {
    /// Interpret a command-line `NAME=VALUE` right-hand side for `feature`.
    ///
    /// Categorical features always keep the text; numeric features must parse.
    pub fn parse_for(feature: Feature, text: &str) -> Result<Self> {
        let text = text.trim();
        if feature.is_categorical() {
            return Ok(Self::Category(text.to_string()));
        }
        if let Ok(value) = text.parse::<i64>() {
            return Ok(Self::Int(value));
        }
        text.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Self::Float)
            .ok_or_else(|| TenureError::schema(format!("{feature} expects a number, got '{text}'")))
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Category(value) => f.write_str(value),
        }
    }
}

/// Named values for a single submission.
///
/// Order is irrelevant here; the encoder projects onto the fitted column
/// order and reports any feature that is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    values: BTreeMap<Feature, RawValue>,
}

impl FeatureRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, feature: Feature, value: RawValue) -> &mut Self {
        self.values.insert(feature, value);
        self
    }

    #[must_use]
    pub fn with(mut self, feature: Feature, value: RawValue) -> Self {
        self.set(feature, value);
        self
    }

    pub fn remove(&mut self, feature: Feature) -> Option<RawValue> {
        self.values.remove(&feature)
    }

    #[must_use]
    pub fn get(&self, feature: Feature) -> Option<&RawValue> {
        self.values.get(&feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, &RawValue)> {
        self.values.iter().map(|(feature, value)| (*feature, value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply a `NAME=VALUE` override.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<Feature> {
        let (name, value) = assignment.split_once('=').ok_or_else(|| {
            TenureError::schema(format!("expected NAME=VALUE, got '{assignment}'"))
        })?;
        let feature = Feature::from_column(name)
            .ok_or_else(|| TenureError::schema(format!("unexpected feature '{}'", name.trim())))?;
        self.set(feature, RawValue::parse_for(feature, value)?);
        Ok(feature)
    }

    /// Parse a TOML table keyed by training column names.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(raw).map_err(|err| {
            TenureError::schema(format!("record is not a valid TOML table: {err}"))
        })?;
        let mut record = Self::new();
        for (name, value) in table {
            let feature = Feature::from_column(&name)
                .ok_or_else(|| TenureError::schema(format!("unexpected feature '{name}'")))?;
            let raw = match value {
                toml::Value::Integer(v) => RawValue::Int(v),
                toml::Value::Float(v) => RawValue::Float(v),
                toml::Value::String(v) => RawValue::Category(v),
                other => {
                    return Err(TenureError::schema(format!(
                        "{feature} has unsupported {} value",
                        other.type_str()
                    )));
                }
            };
            if record.get(feature).is_some() {
                return Err(TenureError::schema(format!(
                    "{feature} is given more than once (last key '{name}')"
                )));
            }
            record.set(feature, raw);
        }
        Ok(record)
    }

    /// Read a record file from disk.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| TenureError::io(path, err))?;
        Self::from_toml_str(&raw)
    }
}
