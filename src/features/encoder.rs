//! Feature encoding: categorical codes, min-max rescale, column projection.
//!
//! The three steps run in a fixed order and never touch I/O. The output is
//! the exact vector the scaler was fitted on, so any change here has to be
//! mirrored in the training pipeline.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::errors::{Result, TenureError};

use super::catalog::{FEATURE_COUNT, FEATURE_ORDER, Feature, FeatureCatalog, catalog};
use super::record::{FeatureRecord, RawValue};

/// Encoded model input in fitted column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

/// One `(column, value)` pair for display and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    /// Training column name.
    pub name: &'static str,
    /// Encoded value.
    pub value: f64,
}

impl FeatureVector {
    /// Wrap an already-ordered vector.
    #[must_use]
    pub const fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Values in fitted column order.
    #[must_use]
    pub const fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Encoded value of one feature.
    #[must_use]
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Column/value pairs in fitted order.
    #[must_use]
    pub fn named(&self) -> Vec<NamedValue> {
        FEATURE_ORDER
            .iter()
            .zip(self.values)
            .map(|(feature, value)| NamedValue {
                name: feature.column(),
                value,
            })
            .collect()
    }
}

/// Stateless encoder over a [`FeatureCatalog`].
#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder<'a> {
    catalog: &'a FeatureCatalog,
}

impl Default for FeatureEncoder<'static> {
    fn default() -> Self {
        Self::new(catalog())
    }
}

impl<'a> FeatureEncoder<'a> {
    /// Encoder over an explicit catalog.
    #[must_use]
    pub const fn new(catalog: &'a FeatureCatalog) -> Self {
        Self { catalog }
    }

    /// Run all three steps on one record.
    pub fn encode(&self, record: &FeatureRecord) -> Result<FeatureVector> {
        let coded = self.encode_categories(record)?;
        let rescaled = self.rescale(coded);
        project(&rescaled)
    }

    /// Step 1: replace every category string with its integer code.
    pub fn encode_categories(&self, record: &FeatureRecord) -> Result<BTreeMap<Feature, f64>> {
        let mut coded = BTreeMap::new();
        for (feature, value) in record.iter() {
            let number = match (self.catalog.category(feature), value) {
                (Some(table), RawValue::Category(text)) => {
                    let code = table.code(text).ok_or_else(|| TenureError::UnknownCategory {
                        feature: feature.column(),
                        value: text.clone(),
                    })?;
                    f64::from(code)
                }
                (Some(_), other) => {
                    return Err(TenureError::schema(format!(
                        "{feature} expects a category, got number {other}"
                    )));
                }
                (None, RawValue::Category(text)) => {
                    return Err(TenureError::schema(format!(
                        "{feature} expects a number, got '{text}'"
                    )));
                }
                #[allow(clippy::cast_precision_loss)]
                (None, RawValue::Int(v)) => *v as f64,
                (None, RawValue::Float(v)) if v.is_finite() => *v,
                (None, RawValue::Float(v)) => {
                    return Err(TenureError::schema(format!(
                        "{feature} must be a finite number, got {v}"
                    )));
                }
            };
            coded.insert(feature, number);
        }
        Ok(coded)
    }

    /// Step 2: divide the rescaled features by their fixed maximum.
    ///
    /// No clamping: values above the maximum come out above 1.0.
    #[must_use]
    pub fn rescale(&self, mut coded: BTreeMap<Feature, f64>) -> BTreeMap<Feature, f64> {
        for (feature, max) in self.catalog.max_values() {
            if let Some(value) = coded.get_mut(&feature) {
                *value /= max;
            }
        }
        coded
    }
}

/// Step 3: project onto the fitted column order.
pub fn project(values: &BTreeMap<Feature, f64>) -> Result<FeatureVector> {
    let missing: Vec<&str> = FEATURE_ORDER
        .iter()
        .filter(|feature| !values.contains_key(feature))
        .map(|feature| feature.column())
        .collect();
    if !missing.is_empty() {
        return Err(TenureError::schema(format!(
            "missing required features: {}",
            missing.join(", ")
        )));
    }
    let mut ordered = [0.0; FEATURE_COUNT];
    for (slot, feature) in ordered.iter_mut().zip(FEATURE_ORDER) {
        *slot = values[&feature];
    }
    Ok(FeatureVector::from_values(ordered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn category(text: &str) -> RawValue {
        RawValue::Category(text.to_string())
    }

    fn scenario_record() -> FeatureRecord {
        FeatureRecord::new()
            .with(Feature::Age, RawValue::Int(30))
            .with(Feature::Gender, category("Male"))
            .with(Feature::MaritalStatus, category("Single"))
            .with(Feature::DistanceFromHome, RawValue::Int(10))
            .with(Feature::JobRole, category("Data Scientist"))
            .with(Feature::Department, category("Technology"))
            .with(Feature::EducationField, category("Computer Science"))
            .with(Feature::Education, RawValue::Int(3))
            .with(Feature::Salary, RawValue::Int(50_000))
            .with(Feature::BusinessTravel, category("Some Travel"))
            .with(Feature::OverTime, category("No"))
            .with(Feature::StockOptionLevel, RawValue::Int(0))
            .with(Feature::YearsInMostRecentRole, RawValue::Int(2))
            .with(Feature::YearsSinceLastPromotion, RawValue::Int(1))
            .with(Feature::YearsWithCurrManager, RawValue::Int(3))
    }

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-4
    }

    #[test]
    fn end_to_end_scenario_encodes_expected_vector() {
        let vector = FeatureEncoder::default()
            .encode(&scenario_record())
            .expect("scenario encodes");
        let expected = [
            1.0,            // Gender: Male
            0.5,            // Age 30 / 60
            2.0,            // BusinessTravel: Some Travel
            2.0,            // Department: Technology
            10.0 / 45.0,    // DistanceFromHome
            3.0,            // Education
            0.0,            // EducationField: Computer Science
            1.0 / 12.0,     // JobRole: Data Scientist
            2.0,            // MaritalStatus: Single
            50_000.0 / 550_000.0,
            0.0,            // StockOptionLevel
            0.0,            // OverTime: No
            0.2,
            0.1,
            0.3,
        ];
        assert_eq!(vector.as_slice().len(), FEATURE_COUNT);
        for (index, (actual, wanted)) in vector.as_slice().iter().zip(expected).enumerate() {
            assert!(
                close(*actual, wanted),
                "column {} ({}) = {actual}, expected {wanted}",
                index,
                FEATURE_ORDER[index]
            );
        }
        assert!(close(vector.get(Feature::DistanceFromHome), 0.2222));
        assert!(close(vector.get(Feature::Salary), 0.0909));
    }

    #[test]
    fn unknown_category_is_rejected_not_defaulted() {
        let record = scenario_record().with(Feature::Department, category("Finance"));
        let err = FeatureEncoder::default()
            .encode(&record)
            .expect_err("Finance is not a department");
        match err {
            TenureError::UnknownCategory { feature, value } => {
                assert_eq!(feature, "Department");
                assert_eq!(value, "Finance");
            }
            other => panic!("expected UnknownCategory, got {other}"),
        }
    }

    #[test]
    fn category_lookup_is_case_sensitive() {
        let record = scenario_record().with(Feature::Gender, category("male"));
        let err = FeatureEncoder::default().encode(&record).expect_err("exact match");
        assert_eq!(err.code(), "TPR-3001");
    }

    #[test]
    fn missing_feature_is_a_schema_mismatch() {
        let mut record = scenario_record();
        record.remove(Feature::Salary);
        record.remove(Feature::OverTime);
        let err = FeatureEncoder::default().encode(&record).expect_err("incomplete");
        assert_eq!(err.code(), "TPR-3002");
        let message = err.to_string();
        assert!(message.contains("Salary"));
        assert!(message.contains("OverTime"));
    }

    #[test]
    fn wrong_value_kind_is_a_schema_mismatch() {
        let numeric_gender = scenario_record().with(Feature::Gender, RawValue::Int(1));
        assert_eq!(
            FeatureEncoder::default()
                .encode(&numeric_gender)
                .expect_err("gender must be text")
                .code(),
            "TPR-3002"
        );
        let text_age = scenario_record().with(Feature::Age, category("thirty"));
        assert_eq!(
            FeatureEncoder::default()
                .encode(&text_age)
                .expect_err("age must be numeric")
                .code(),
            "TPR-3002"
        );
    }

    #[test]
    fn non_finite_numbers_are_a_schema_mismatch() {
        for (feature, value) in [
            (Feature::Age, f64::NAN),
            (Feature::DistanceFromHome, f64::INFINITY),
            (Feature::Education, f64::NEG_INFINITY),
        ] {
            let record = scenario_record().with(feature, RawValue::Float(value));
            let err = FeatureEncoder::default()
                .encode(&record)
                .expect_err("non-finite input");
            assert_eq!(err.code(), "TPR-3002", "{feature} = {value}");
            assert!(err.to_string().contains(feature.column()));
        }
    }

    #[test]
    fn values_above_max_are_not_clamped() {
        let record = scenario_record().with(Feature::Age, RawValue::Int(90));
        let vector = FeatureEncoder::default().encode(&record).expect("encodes");
        assert!(close(vector.get(Feature::Age), 1.5));
    }

    #[test]
    fn job_role_keeps_twelve_divisor() {
        let record = scenario_record().with(Feature::JobRole, category("Software Engineer"));
        let vector = FeatureEncoder::default().encode(&record).expect("encodes");
        assert!(close(vector.get(Feature::JobRole), 9.0 / 12.0));
    }

    #[test]
    fn non_rescaled_features_pass_through() {
        let record = scenario_record()
            .with(Feature::Education, RawValue::Int(5))
            .with(Feature::StockOptionLevel, RawValue::Int(3));
        let vector = FeatureEncoder::default().encode(&record).expect("encodes");
        assert!(close(vector.get(Feature::Education), 5.0));
        assert!(close(vector.get(Feature::StockOptionLevel), 3.0));
    }

    #[test]
    fn named_output_follows_fitted_order() {
        let vector = FeatureEncoder::default()
            .encode(&scenario_record())
            .expect("encodes");
        let names: Vec<&str> = vector.named().iter().map(|pair| pair.name).collect();
        assert_eq!(names.first(), Some(&"Gender"));
        assert_eq!(names.get(4), Some(&"DistanceFromHome (KM)"));
        assert_eq!(names.last(), Some(&"YearsWithCurrManager"));
    }

    proptest! {
        #[test]
        fn every_allowed_option_encodes_to_its_code(pick in 0_usize..64) {
            for table in catalog().categories() {
                let options = table.display_options();
                let option = options[pick % options.len()];
                let record = scenario_record().with(table.feature(), category(option));
                let coded = FeatureEncoder::default()
                    .encode_categories(&record)
                    .expect("allowed option encodes");
                let code = table.code(option).expect("option has a code");
                prop_assert_eq!(coded[&table.feature()], f64::from(code));
            }
        }
    }
}
