//! Shared harness for CLI integration tests.
//!
//! Every case runs the `tenure` binary in its own temporary working directory
//! and keeps a transcript under the cargo target tmpdir for post-mortems.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Outcome of one CLI invocation.
pub struct CliResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

/// Scaler artifact that leaves its input untouched.
pub const IDENTITY_SCALER: &str = r#"{
  "kind": "standard_scaler",
  "mean": [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
  "scale": [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1]
}"#;

/// Linear model artifact that ignores its input and returns `intercept`.
pub fn constant_model(intercept: f64) -> String {
    format!(
        r#"{{"kind":"linear","coefficients":[0,0,0,0,0,0,0,0,0,0,0,0,0,0,0],"intercept":{intercept}}}"#
    )
}

/// The default artifact names, placed in `dir`.
pub fn write_artifacts(dir: &Path, scaler: &str, model: &str) {
    std::fs::write(dir.join("scaler.json"), scaler).expect("write scaler");
    std::fs::write(dir.join("gradient_boosting_regressor_model.json"), model)
        .expect("write model");
}

/// Run the CLI in a fresh empty directory.
pub fn run_cli_case(case_name: &str, args: &[&str]) -> CliResult {
    let dir = tempfile::tempdir().expect("tempdir");
    run_cli_case_in(case_name, dir.path(), args, None)
}

/// Run the CLI in `dir`, optionally feeding `stdin`.
pub fn run_cli_case_in(
    case_name: &str,
    dir: &Path,
    args: &[&str],
    stdin: Option<&str>,
) -> CliResult {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tenure"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn tenure binary");

    if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
        pipe.write_all(input.as_bytes()).expect("write stdin");
    }
    let output = child.wait_with_output().expect("wait for tenure binary");

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let log_path = write_case_log(case_name, args, &output.status, &stdout, &stderr);

    CliResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

fn write_case_log(
    case_name: &str,
    args: &[&str],
    status: &ExitStatus,
    stdout: &str,
    stderr: &str,
) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("cli-cases");
    std::fs::create_dir_all(&dir).expect("create case log dir");
    let path = dir.join(format!("{case_name}.log"));
    let mut transcript = String::new();
    let _ = writeln!(transcript, "args: {args:?}");
    let _ = writeln!(transcript, "status: {status}");
    let _ = writeln!(transcript, "--- stdout ---\n{stdout}");
    let _ = writeln!(transcript, "--- stderr ---\n{stderr}");
    std::fs::write(&path, transcript).expect("write case log");
    path
}
