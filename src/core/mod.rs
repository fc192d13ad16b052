//! Core plumbing: configuration and the error taxonomy.

pub mod config;
pub mod errors;
