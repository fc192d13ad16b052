//! Operator form: the fifteen labeled controls, their bounds and defaults.
//!
//! Select controls read their choices from the feature catalog, so the form
//! can only offer values the encoder knows how to code.

#![allow(missing_docs)]

pub mod prompt;

use crate::core::errors::{Result, TenureError};
use crate::features::catalog::catalog;
use crate::features::{Feature, FeatureRecord, RawValue};

pub use prompt::{FormSession, parse_answer, parse_answer_or};

/// Visual grouping of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Personal,
    Job,
    Work,
}

impl Section {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Personal => "Personal Information",
            Self::Job => "Job Details",
            Self::Work => "Work-Related Inputs",
        }
    }
}

/// Input control kind with its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Free integer entry within bounds.
    Number {
        min: i64,
        max: i64,
        default: i64,
        step: i64,
    },
    /// Small integer range.
    Slider { min: i64, max: i64, default: i64 },
    /// Single choice from the catalog; default is the first display option.
    Select,
}

impl Control {
    /// Integer bounds for numeric controls.
    #[must_use]
    pub const fn bounds(self) -> Option<(i64, i64)> {
        match self {
            Self::Number { min, max, .. } | Self::Slider { min, max, .. } => Some((min, max)),
            Self::Select => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub feature: Feature,
    pub section: Section,
    pub label: &'static str,
    pub control: Control,
}

const fn number(
    feature: Feature,
    section: Section,
    label: &'static str,
    min: i64,
    max: i64,
    default: i64,
) -> FieldSpec {
    FieldSpec {
        feature,
        section,
        label,
        control: Control::Number {
            min,
            max,
            default,
            step: 1,
        },
    }
}

const fn select(feature: Feature, section: Section, label: &'static str) -> FieldSpec {
    FieldSpec {
        feature,
        section,
        label,
        control: Control::Select,
    }
}

const fn slider(
    feature: Feature,
    section: Section,
    label: &'static str,
    min: i64,
    max: i64,
    default: i64,
) -> FieldSpec {
    FieldSpec {
        feature,
        section,
        label,
        control: Control::Slider { min, max, default },
    }
}

/// Fields in the order they are presented. Upper bounds of rescaled features
/// equal their max-value table entries.
pub static FORM_FIELDS: [FieldSpec; 15] = [
    number(Feature::Age, Section::Personal, "Age", 18, 60, 30),
    select(Feature::Gender, Section::Personal, "Gender"),
    select(Feature::MaritalStatus, Section::Personal, "MaritalStatus"),
    number(
        Feature::DistanceFromHome,
        Section::Personal,
        "DistanceFromHome (KM)",
        1,
        45,
        10,
    ),
    select(Feature::JobRole, Section::Job, "JobRole"),
    select(Feature::Department, Section::Job, "Department"),
    select(Feature::EducationField, Section::Job, "EducationField"),
    slider(Feature::Education, Section::Job, "EducationLevel", 1, 5, 3),
    FieldSpec {
        feature: Feature::Salary,
        section: Section::Work,
        label: "Salary",
        control: Control::Number {
            min: 10_000,
            max: 550_000,
            default: 50_000,
            step: 1_000,
        },
    },
    select(Feature::BusinessTravel, Section::Work, "BusinessTravel"),
    select(Feature::OverTime, Section::Work, "OverTime"),
    slider(
        Feature::StockOptionLevel,
        Section::Work,
        "StockOptionLevel",
        0,
        3,
        0,
    ),
    number(
        Feature::YearsInMostRecentRole,
        Section::Work,
        "YearsInMostRecentRole",
        0,
        10,
        2,
    ),
    number(
        Feature::YearsSinceLastPromotion,
        Section::Work,
        "YearsSinceLastPromotion",
        0,
        10,
        1,
    ),
    number(
        Feature::YearsWithCurrManager,
        Section::Work,
        "YearsWithCurrManager",
        0,
        10,
        3,
    ),
];

impl FieldSpec {
    /// Choices for a select control, in display order.
    #[must_use]
    pub fn options(&self) -> &'static [&'static str] {
        catalog()
            .category(self.feature)
            .map(|table| table.display_options())
            .unwrap_or_default()
    }

    /// Value used when the operator accepts the default.
    #[must_use]
    pub fn default_value(&self) -> RawValue {
        match self.control {
            Control::Number { default, .. } | Control::Slider { default, .. } => {
                RawValue::Int(default)
            }
            Control::Select => RawValue::Category(
                self.options()
                    .first()
                    .map(|option| (*option).to_string())
                    .unwrap_or_default(),
            ),
        }
    }
}

/// Look up the form field for a feature.
#[must_use]
pub fn field(feature: Feature) -> Option<&'static FieldSpec> {
    FORM_FIELDS.iter().find(|spec| spec.feature == feature)
}

/// A complete record holding every field's default.
#[must_use]
pub fn default_record() -> FeatureRecord {
    let mut record = FeatureRecord::new();
    for spec in &FORM_FIELDS {
        record.set(spec.feature, spec.default_value());
    }
    record
}

/// Enforce the form's numeric bounds on a record that did not come through
/// the prompts. Numeric controls only take whole numbers, so fractional
/// overrides are rejected too.
pub fn check_bounds(record: &FeatureRecord) -> Result<()> {
    for spec in &FORM_FIELDS {
        let Some((min, max)) = spec.control.bounds() else {
            continue;
        };
        #[allow(clippy::cast_precision_loss)]
        let value = match record.get(spec.feature) {
            Some(RawValue::Int(v)) => *v as f64,
            Some(RawValue::Float(v)) if v.fract().abs() < f64::EPSILON => *v,
            Some(RawValue::Float(v)) => {
                return Err(TenureError::schema(format!(
                    "{} takes whole numbers, got {v}",
                    spec.feature
                )));
            }
            _ => continue,
        };
        #[allow(clippy::cast_precision_loss)]
        let (low, high) = (min as f64, max as f64);
        if value < low || value > high {
            return Err(TenureError::FieldOutOfRange {
                field: spec.feature.column(),
                value,
                min,
                max,
            });
        }
    }
    Ok(())
}
