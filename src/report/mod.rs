//! Result presentation: denormalize, round, and lay out operator banners.
//!
//! Formatting here is plain text; the CLI decides whether banners get color.

#![allow(missing_docs)]

use std::fmt::Write as _;

use serde::Serialize;

use crate::core::errors::TenureError;
use crate::features::encoder::NamedValue;
use crate::features::{FeatureVector, TENURE_MAX_YEARS};

/// Operator-facing message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerLevel {
    Success,
    Warning,
    Error,
}

/// One message line for the display surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
}

impl Banner {
    fn new(level: BannerLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Advisory shown for a negative prediction. Not an error.
pub const NEGATIVE_ADVISORY: &str = "The prediction is below 0. The input combination may be \
     atypical, or the model may need review.";

/// Model output in normalized space converted back to years.
#[must_use]
pub fn denormalize(normalized: f64) -> f64 {
    normalized * TENURE_MAX_YEARS
}

/// Nearest whole year, ties to even (3.5 -> 4, 2.5 -> 2).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn headline_years(years: f64) -> i64 {
    years.round_ties_even() as i64
}

/// Everything the presenter shows for one successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenurePrediction {
    pub features: Vec<NamedValue>,
    pub normalized: f64,
    pub years: f64,
    pub headline: i64,
    pub advisory: Option<String>,
}

impl TenurePrediction {
    #[must_use]
    pub fn new(features: &FeatureVector, normalized: f64) -> Self {
        let years = denormalize(normalized);
        Self {
            features: features.named(),
            normalized,
            years,
            headline: headline_years(years),
            advisory: (years < 0.0).then(|| NEGATIVE_ADVISORY.to_string()),
        }
    }

    /// Banners in display order: the headline, then any advisory.
    #[must_use]
    pub fn banners(&self) -> Vec<Banner> {
        // The headline is already a whole number but is still shown with two
        // decimals, matching the established display.
        #[allow(clippy::cast_precision_loss)]
        let headline = self.headline as f64;
        let mut banners = vec![Banner::new(
            BannerLevel::Success,
            format!("Predicted years of service in the company: {headline:.2} years"),
        )];
        if let Some(advisory) = &self.advisory {
            banners.push(Banner::new(BannerLevel::Warning, advisory.clone()));
        }
        banners
    }

    /// Detail lines under the banners.
    #[must_use]
    pub fn details(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "  unrounded: {:.2} years", self.years);
        let _ = writeln!(out, "  normalized model output: {:.4}", self.normalized);
        out
    }
}

/// Error banner for a failed load or submission.
#[must_use]
pub fn error_banner(err: &TenureError) -> Banner {
    Banner::new(BannerLevel::Error, err.to_string())
}

/// Diagnostics shown under an error banner, if the failure has any.
#[must_use]
pub fn error_details(err: &TenureError) -> Option<String> {
    match err {
        TenureError::ScalerError { unscaled, .. } => Some(format!(
            "Input before standardization (after min-max rescale):\n{}",
            format_unscaled(unscaled)
        )),
        _ => None,
    }
}

/// Two-column feature table used for diagnostics.
#[must_use]
pub fn format_feature_table(features: &[NamedValue]) -> String {
    let width = features
        .iter()
        .map(|pair| pair.name.len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for pair in features {
        let _ = writeln!(out, "  {:<width$}  {:>12.6}", pair.name, pair.value);
    }
    out
}

/// Table of a raw vector under the fitted column names, for when a scaler
/// rejects it. Extra or missing positions are labeled by index.
#[must_use]
pub fn format_unscaled(values: &[f64]) -> String {
    let named: Vec<NamedValue> = values
        .iter()
        .enumerate()
        .map(|(index, value)| NamedValue {
            name: crate::features::FEATURE_ORDER
                .get(index)
                .map_or("(extra)", |feature| feature.column()),
            value: *value,
        })
        .collect();
    format_feature_table(&named)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COUNT;

    fn vector() -> FeatureVector {
        FeatureVector::from_values([0.5; FEATURE_COUNT])
    }

    #[test]
    fn denormalizes_by_tenure_max() {
        let prediction = TenurePrediction::new(&vector(), 0.35);
        assert!((prediction.years - 3.5).abs() < 1e-12);
        assert_eq!(prediction.headline, 4);
        assert!(prediction.advisory.is_none());
        assert!(prediction.details().contains("3.50"));
    }

    #[test]
    fn headline_is_shown_with_two_decimals() {
        let banners = TenurePrediction::new(&vector(), 0.35).banners();
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].level, BannerLevel::Success);
        assert!(banners[0].message.contains("4.00 years"), "{}", banners[0].message);
    }

    #[test]
    fn rounding_ties_go_to_even() {
        assert_eq!(headline_years(3.5), 4);
        assert_eq!(headline_years(2.5), 2);
        assert_eq!(headline_years(2.51), 3);
        assert_eq!(headline_years(-0.5), 0);
        assert_eq!(headline_years(-1.5), -2);
    }

    #[test]
    fn negative_prediction_adds_warning_without_clamping() {
        let prediction = TenurePrediction::new(&vector(), -0.12);
        assert!((prediction.years - -1.2).abs() < 1e-12);
        assert_eq!(prediction.headline, -1);
        let banners = prediction.banners();
        assert_eq!(banners.len(), 2);
        assert_eq!(banners[1].level, BannerLevel::Warning);
        assert!(banners[0].message.contains("-1.00"));
    }

    #[test]
    fn unscaled_table_labels_columns() {
        let table = format_unscaled(&[0.5, 1.0]);
        assert!(table.contains("Gender"));
        assert!(table.contains("Age"));
        assert!(table.contains("0.500000"));
    }

    #[test]
    fn scaler_failures_show_the_unscaled_vector() {
        let err = TenureError::ScalerError {
            details: "expected 15 columns".to_string(),
            unscaled: vec![1.0, 0.5],
        };
        let banner = error_banner(&err);
        assert_eq!(banner.level, BannerLevel::Error);
        assert!(banner.message.starts_with("[TPR-4001]"));
        let details = error_details(&err).expect("scaler failures carry details");
        assert!(details.starts_with("Input before standardization"));
        assert!(details.contains("Gender"));
        assert!(details.contains("0.500000"));

        let other = TenureError::InferenceError {
            details: "boom".to_string(),
        };
        assert!(error_details(&other).is_none());
    }

    #[test]
    fn json_payload_has_expected_fields() {
        let prediction = TenurePrediction::new(&vector(), 0.2);
        let value = serde_json::to_value(&prediction).expect("serializable");
        assert_eq!(value["headline"], 2);
        assert_eq!(value["features"].as_array().map(Vec::len), Some(FEATURE_COUNT));
        assert!(value["advisory"].is_null());
    }
}
