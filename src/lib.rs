//! Employee tenure predictor.
//!
//! Turns a fifteen-field form submission into the fixed feature vector a
//! pre-trained regressor expects, runs the fitted scaler and model, and
//! reports the prediction as whole years at the company.

pub mod core;
pub mod features;
pub mod form;
pub mod logger;
pub mod model;
pub mod report;

#[cfg(feature = "cli")]
pub mod cli_app;
