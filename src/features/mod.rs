//! Feature handling: the fixed catalog, raw submission records, and the
//! encode/rescale/reorder pipeline that turns a record into model input.

pub mod catalog;
pub mod encoder;
pub mod record;

pub use catalog::{FEATURE_COUNT, FEATURE_ORDER, Feature, TENURE_MAX_YEARS, catalog};
pub use encoder::{FeatureEncoder, FeatureVector};
pub use record::{FeatureRecord, RawValue};
