//! Append-only JSONL event log with graceful degradation.
//!
//! A failed write never fails the submission: the first failure is reported
//! once on stderr and later writes are skipped.

#![allow(missing_docs)]

use std::cell::Cell;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::errors::{Result, TenureError};
use crate::model::ArtifactInfo;

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    ArtifactsLoaded {
        model: ArtifactInfo,
        scaler: ArtifactInfo,
    },
    /// Startup halted before any form was shown.
    ArtifactsFailed {
        code: &'static str,
        message: String,
    },
    Prediction {
        normalized: f64,
        years: f64,
        headline: i64,
        advisory: bool,
    },
    PredictionFailed {
        code: &'static str,
        message: String,
    },
}

/// One JSONL line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEvent {
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl LogEvent {
    #[must_use]
    pub fn now(kind: EventKind) -> Self {
        Self {
            ts: Utc::now(),
            kind,
        }
    }
}

/// Event sink. A logger without a path discards everything.
#[derive(Debug, Default)]
pub struct JsonlLogger {
    path: Option<PathBuf>,
    degraded: Cell<bool>,
}

impl JsonlLogger {
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            degraded: Cell::new(false),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether a write has failed and logging has been switched off.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.get()
    }

    /// Record an event, degrading instead of failing.
    pub fn log(&self, kind: EventKind) {
        let Some(path) = &self.path else {
            return;
        };
        if self.degraded.get() {
            return;
        }
        if let Err(err) = append(path, &LogEvent::now(kind)) {
            self.degraded.set(true);
            eprintln!("warning: event log disabled: {err}");
        }
    }
}

fn append(path: &Path, event: &LogEvent) -> Result<()> {
    let mut line = serde_json::to_string(event)?;
    line.push('\n');
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| TenureError::io(path, err))?;
    file.write_all(line.as_bytes())
        .map_err(|err| TenureError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_line_per_event() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.jsonl");
        let logger = JsonlLogger::new(Some(path.clone()));
        logger.log(EventKind::Prediction {
            normalized: 0.35,
            years: 3.5,
            headline: 4,
            advisory: false,
        });
        logger.log(EventKind::PredictionFailed {
            code: "TPR-3001",
            message: "unknown category".to_string(),
        });

        let raw = std::fs::read_to_string(&path).expect("log written");
        let lines: Vec<serde_json::Value> = raw
            .lines()
            .map(|line| serde_json::from_str(line).expect("valid json line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "prediction");
        assert_eq!(lines[0]["headline"], 4);
        assert!(lines[0]["ts"].is_string());
        assert_eq!(lines[1]["event"], "prediction_failed");
        assert_eq!(lines[1]["code"], "TPR-3001");
    }

    #[test]
    fn startup_failures_have_their_own_event() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.jsonl");
        JsonlLogger::new(Some(path.clone())).log(EventKind::ArtifactsFailed {
            code: "TPR-2001",
            message: "model artifact not found".to_string(),
        });
        let raw = std::fs::read_to_string(&path).expect("log written");
        let line: serde_json::Value = serde_json::from_str(raw.trim()).expect("json line");
        assert_eq!(line["event"], "artifacts_failed");
        assert_eq!(line["code"], "TPR-2001");
    }

    #[test]
    fn unwritable_path_degrades_instead_of_failing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let logger = JsonlLogger::new(Some(dir.path().join("missing/dir/events.jsonl")));
        logger.log(EventKind::PredictionFailed {
            code: "TPR-4002",
            message: "boom".to_string(),
        });
        assert!(logger.is_degraded());
    }

    #[test]
    fn disabled_logger_is_silent() {
        let logger = JsonlLogger::disabled();
        logger.log(EventKind::PredictionFailed {
            code: "TPR-4002",
            message: "boom".to_string(),
        });
        assert!(!logger.is_degraded());
    }
}
