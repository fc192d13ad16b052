//! Event logging: append-only JSONL with graceful degradation.

pub mod jsonl;

pub use jsonl::{EventKind, JsonlLogger, LogEvent};
