//! Fixed feature catalog: column order, categorical code tables, and the
//! max-value table used for min-max rescaling.
//!
//! Everything here must stay in lockstep with the training pipeline. The form
//! reads its choices from [`CategoryTable::display_options`], so the set of
//! selectable values and the set of encodable values are the same data.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Upper bound of the training target (years at company) used to denormalize
/// model output.
pub const TENURE_MAX_YEARS: f64 = 10.0;

/// Number of model input columns.
pub const FEATURE_COUNT: usize = 15;

/// One model input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    Gender,
    Age,
    BusinessTravel,
    Department,
    DistanceFromHome,
    Education,
    EducationField,
    JobRole,
    MaritalStatus,
    Salary,
    StockOptionLevel,
    OverTime,
    YearsInMostRecentRole,
    YearsSinceLastPromotion,
    YearsWithCurrManager,
}

/// Column order the scaler and model were fitted on.
pub const FEATURE_ORDER: [Feature; FEATURE_COUNT] = [
    Feature::Gender,
    Feature::Age,
    Feature::BusinessTravel,
    Feature::Department,
    Feature::DistanceFromHome,
    Feature::Education,
    Feature::EducationField,
    Feature::JobRole,
    Feature::MaritalStatus,
    Feature::Salary,
    Feature::StockOptionLevel,
    Feature::OverTime,
    Feature::YearsInMostRecentRole,
    Feature::YearsSinceLastPromotion,
    Feature::YearsWithCurrManager,
];

impl Feature {
    /// Column name as it appeared in the training data.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Gender => "Gender",
            Self::Age => "Age",
            Self::BusinessTravel => "BusinessTravel",
            Self::Department => "Department",
            Self::DistanceFromHome => "DistanceFromHome (KM)",
            Self::Education => "Education",
            Self::EducationField => "EducationField",
            Self::JobRole => "JobRole",
            Self::MaritalStatus => "MaritalStatus",
            Self::Salary => "Salary",
            Self::StockOptionLevel => "StockOptionLevel",
            Self::OverTime => "OverTime",
            Self::YearsInMostRecentRole => "YearsInMostRecentRole",
            Self::YearsSinceLastPromotion => "YearsSinceLastPromotion",
            Self::YearsWithCurrManager => "YearsWithCurrManager",
        }
    }

    /// Resolve a column name. `DistanceFromHome` is accepted without the unit
    /// suffix since it is awkward to type on a command line.
    #[must_use]
    pub fn from_column(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed == "DistanceFromHome" {
            return Some(Self::DistanceFromHome);
        }
        FEATURE_ORDER
            .iter()
            .copied()
            .find(|feature| feature.column() == trimmed)
    }

    /// Whether this column takes a category string rather than a number.
    #[must_use]
    pub const fn is_categorical(self) -> bool {
        matches!(
            self,
            Self::Gender
                | Self::BusinessTravel
                | Self::Department
                | Self::EducationField
                | Self::JobRole
                | Self::MaritalStatus
                | Self::OverTime
        )
    }

    /// Position of this column in [`FEATURE_ORDER`].
    #[must_use]
    pub fn index(self) -> usize {
        FEATURE_ORDER
            .iter()
            .position(|feature| *feature == self)
            .unwrap_or(FEATURE_COUNT)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ──────────────────── option lists ────────────────────

const GENDER_OPTIONS: &[&str] = &["Female", "Male", "Non-Binary"];
const BUSINESS_TRAVEL_OPTIONS: &[&str] = &["Frequent Travel", "No Travel", "Some Travel"];
const DEPARTMENT_OPTIONS: &[&str] = &["Human Resources", "Sales", "Technology"];
const EDUCATION_FIELD_OPTIONS: &[&str] = &[
    "Computer Science",
    "Economics",
    "Human Resources",
    "Life Sciences",
    "Marketing",
    "Medical",
    "Other",
    "Technical Degree",
];
// Display order is not sorted; codes are assigned after sorting.
const JOB_ROLE_OPTIONS: &[&str] = &[
    "Business Analyst",
    "Data Scientist",
    "Engineering Manager",
    "HR Business Partner",
    "HR Generalist",
    "Product Manager",
    "Recruiter",
    "Sales Executive",
    "Software Engineer",
    "Sales Representative",
];
const MARITAL_STATUS_OPTIONS: &[&str] = &["Divorced", "Married", "Single"];
const OVER_TIME_OPTIONS: &[&str] = &["No", "Yes"];

// ──────────────────── code tables ────────────────────

/// Dense integer codes for one categorical feature, assigned alphabetically.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    feature: Feature,
    display: &'static [&'static str],
    codes: BTreeMap<&'static str, u32>,
}

impl CategoryTable {
    fn new(feature: Feature, display: &'static [&'static str]) -> Self {
        let mut sorted = display.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let codes = sorted
            .into_iter()
            .zip(0_u32..)
            .collect::<BTreeMap<_, _>>();
        Self {
            feature,
            display,
            codes,
        }
    }

    #[must_use]
    pub const fn feature(&self) -> Feature {
        self.feature
    }

    /// Options in the order the form presents them.
    #[must_use]
    pub const fn display_options(&self) -> &'static [&'static str] {
        self.display
    }

    /// Exact-match lookup of a category's code.
    #[must_use]
    pub fn code(&self, value: &str) -> Option<u32> {
        self.codes.get(value).copied()
    }

    /// `(option, code)` pairs in code order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        self.codes.iter().map(|(option, code)| (*option, *code))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Immutable lookup tables shared by the form, the encoder and the CLI.
#[derive(Debug)]
pub struct FeatureCatalog {
    categories: BTreeMap<Feature, CategoryTable>,
    max_values: BTreeMap<Feature, f64>,
}

static CATALOG: LazyLock<FeatureCatalog> = LazyLock::new(FeatureCatalog::build);

/// Process-wide catalog, built on first use.
#[must_use]
pub fn catalog() -> &'static FeatureCatalog {
    &CATALOG
}

impl FeatureCatalog {
    fn build() -> Self {
        let categories = [
            (Feature::Gender, GENDER_OPTIONS),
            (Feature::BusinessTravel, BUSINESS_TRAVEL_OPTIONS),
            (Feature::Department, DEPARTMENT_OPTIONS),
            (Feature::EducationField, EDUCATION_FIELD_OPTIONS),
            (Feature::JobRole, JOB_ROLE_OPTIONS),
            (Feature::MaritalStatus, MARITAL_STATUS_OPTIONS),
            (Feature::OverTime, OVER_TIME_OPTIONS),
        ]
        .into_iter()
        .map(|(feature, options)| (feature, CategoryTable::new(feature, options)))
        .collect();

        // JobRole codes only reach 9 but the training pipeline divided by 12.
        let max_values = [
            (Feature::Age, 60.0),
            (Feature::DistanceFromHome, 45.0),
            (Feature::Salary, 550_000.0),
            (Feature::JobRole, 12.0),
            (Feature::YearsInMostRecentRole, 10.0),
            (Feature::YearsSinceLastPromotion, 10.0),
            (Feature::YearsWithCurrManager, 10.0),
        ]
        .into_iter()
        .collect();

        Self {
            categories,
            max_values,
        }
    }

    /// Code table for a categorical feature, `None` for numeric ones.
    #[must_use]
    pub fn category(&self, feature: Feature) -> Option<&CategoryTable> {
        self.categories.get(&feature)
    }

    /// All code tables in feature order.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryTable> {
        self.categories.values()
    }

    /// Rescale divisor for a feature, `None` when the feature is not rescaled.
    #[must_use]
    pub fn max_value(&self, feature: Feature) -> Option<f64> {
        self.max_values.get(&feature).copied()
    }

    /// All `(feature, max)` pairs in feature order.
    pub fn max_values(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        self.max_values.iter().map(|(feature, max)| (*feature, *max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn gender_codes_follow_sorted_order() {
        let table = catalog().category(Feature::Gender).expect("gender table");
        assert_eq!(table.code("Female"), Some(0));
        assert_eq!(table.code("Male"), Some(1));
        assert_eq!(table.code("Non-Binary"), Some(2));
        assert_eq!(table.code("male"), None);
    }

    #[test]
    fn job_role_codes_are_sorted_not_display_ordered() {
        let table = catalog().category(Feature::JobRole).expect("job role table");
        assert_eq!(table.display_options()[8], "Software Engineer");
        assert_eq!(table.code("Sales Representative"), Some(8));
        assert_eq!(table.code("Software Engineer"), Some(9));
        assert_eq!(table.code("Data Scientist"), Some(1));
        assert_eq!(table.len(), 10);
    }

    #[test]
    fn every_categorical_feature_has_a_table() {
        for feature in FEATURE_ORDER {
            assert_eq!(
                catalog().category(feature).is_some(),
                feature.is_categorical(),
                "table presence mismatch for {feature}"
            );
        }
    }

    #[test]
    fn codes_are_dense_and_cover_every_option() {
        for table in catalog().categories() {
            let codes: Vec<u32> = table.entries().map(|(_, code)| code).collect();
            let expected: Vec<u32> = (0..u32::try_from(table.len()).expect("small")).collect();
            assert_eq!(codes, expected, "codes for {}", table.feature());
            for option in table.display_options() {
                assert!(table.code(option).is_some(), "{option} not encodable");
            }
            assert_eq!(table.display_options().len(), table.len());
        }
    }

    #[test]
    fn exactly_seven_features_are_rescaled() {
        let rescaled: Vec<Feature> = catalog().max_values().map(|(f, _)| f).collect();
        assert_eq!(rescaled.len(), 7);
        assert_eq!(catalog().max_value(Feature::JobRole), Some(12.0));
        assert_eq!(catalog().max_value(Feature::Education), None);
    }

    #[test]
    fn column_names_round_trip() {
        for feature in FEATURE_ORDER {
            assert_eq!(Feature::from_column(feature.column()), Some(feature));
        }
        assert_eq!(
            Feature::from_column("DistanceFromHome"),
            Some(Feature::DistanceFromHome)
        );
        assert_eq!(Feature::from_column("YearsAtCompany"), None);
        assert_eq!(Feature::Salary.index(), 9);
    }

    proptest! {
        #[test]
        fn rescale_round_trip(value in 0.0_f64..1_000_000.0, pick in 0_usize..7) {
            let (_, max) = catalog().max_values().nth(pick).expect("seven entries");
            let restored = (value / max) * max;
            prop_assert!((restored - value).abs() <= value.abs() * 1e-12 + 1e-9);
        }
    }
}
