//! Top-level CLI definition and dispatch.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use serde::Serialize;

use crate::core::config::Config;
use crate::core::errors::{Result, TenureError};
use crate::features::catalog::catalog;
use crate::features::{FeatureEncoder, FeatureRecord, TENURE_MAX_YEARS};
use crate::form::{self, FormSession};
use crate::logger::{EventKind, JsonlLogger};
use crate::model::{ArtifactInfo, Predictor, load_artifacts};
use crate::report::{
    Banner, BannerLevel, TenurePrediction, error_banner, error_details, format_feature_table,
};

/// Employee tenure predictor: encodes a form submission and predicts years at the company.
#[derive(Parser)]
#[command(name = "tenure", version, about)]
pub struct Cli {
    /// Configuration file (defaults to ./tenure.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Model artifact, overriding the configuration.
    #[arg(long, global = true, value_name = "PATH")]
    pub model: Option<PathBuf>,
    /// Scaler artifact, overriding the configuration.
    #[arg(long, global = true, value_name = "PATH")]
    pub scaler: Option<PathBuf>,
    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Fill in the form and predict tenure.
    Predict(InputArgs),
    /// Show the encoded feature vector without loading any model.
    Encode(InputArgs),
    /// List categorical codes and rescale maxima.
    Options {
        /// Emit JSON.
        #[arg(long)]
        json: bool,
    },
    /// Load both artifacts and report their provenance.
    Check {
        /// Emit JSON.
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

/// Where the submission's values come from.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Skip prompting and use every field's default.
    #[arg(long, conflicts_with = "input")]
    pub defaults: bool,
    /// Read the record from a TOML table keyed by column name.
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,
    /// Override one field, e.g. `--set JobRole="Data Scientist"`.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub assignments: Vec<String>,
    /// Emit JSON.
    #[arg(long)]
    pub json: bool,
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    match &cli.command {
        Command::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "tenure", &mut io::stdout());
            Ok(())
        }
        Command::Options { json } => run_options(*json),
        Command::Encode(args) => {
            // Encoding reads nothing from the config; loading it still
            // validates the file and applies `[display] color`.
            let _config = load_config(cli)?;
            run_encode(args)
        }
        Command::Check { json } => {
            let config = load_config(cli)?;
            run_check(&config, *json)
        }
        Command::Predict(args) => {
            let config = load_config(cli)?;
            run_predict(&config, args)
        }
    }
}

/// Print an error banner, plus any diagnostics it carries, on stderr.
pub fn report_error(err: &TenureError) {
    let _ = write_failure(&mut io::stderr().lock(), err);
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(model) = &cli.model {
        config.artifacts.model_path.clone_from(model);
    }
    if let Some(scaler) = &cli.scaler {
        config.artifacts.scaler_path.clone_from(scaler);
    }
    if !config.display.color {
        colored::control::set_override(false);
    }
    config.validate()?;
    Ok(config)
}

// ──────────────────── predict ────────────────────

fn run_predict(config: &Config, args: &InputArgs) -> Result<()> {
    let logger = JsonlLogger::new(config.logging.jsonl_path.clone());

    // Artifacts load before any form is shown.
    let artifacts = load_artifacts(&config.artifact_paths()).inspect_err(|err| {
        logger.log(EventKind::ArtifactsFailed {
            code: err.code(),
            message: err.to_string(),
        });
    })?;
    logger.log(EventKind::ArtifactsLoaded {
        model: artifacts.model_info.clone(),
        scaler: artifacts.scaler_info.clone(),
    });
    let predictor = artifacts.predictor();

    if args.defaults || args.input.is_some() {
        let outcome = gather_record(args).and_then(|record| submit(&predictor, &record));
        log_outcome(&logger, &outcome);
        return present(&outcome?, args.json);
    }
    run_interactive(&predictor, &logger, args)
}

/// Form loop: a failed submission is reported and the operator may correct
/// it, with the artifacts kept loaded and the last answers as defaults.
fn run_interactive(
    predictor: &Predictor<'_>,
    logger: &JsonlLogger,
    args: &InputArgs,
) -> Result<()> {
    print_form_header();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut previous: Option<FeatureRecord> = None;
    loop {
        let mut session = FormSession::new(&mut input, io::stdout());
        if let Some(previous) = &previous {
            session = session.with_defaults(previous);
        }
        let answers = session.collect()?;
        let outcome =
            finish_record(answers.clone(), args).and_then(|record| submit(predictor, &record));
        log_outcome(logger, &outcome);
        match outcome {
            Ok(prediction) => present(&prediction, args.json)?,
            Err(err) if err.halts_startup() => return Err(err),
            Err(err) => report_error(&err),
        }
        if !session.confirm("\nSubmit again? Previous answers become the defaults.")? {
            return Ok(());
        }
        previous = Some(answers);
    }
}

fn submit(predictor: &Predictor<'_>, record: &FeatureRecord) -> Result<TenurePrediction> {
    let features = FeatureEncoder::default().encode(record)?;
    let normalized = predictor.predict(&features)?;
    Ok(TenurePrediction::new(&features, normalized))
}

fn log_outcome(logger: &JsonlLogger, outcome: &Result<TenurePrediction>) {
    let event = match outcome {
        Ok(prediction) => EventKind::Prediction {
            normalized: prediction.normalized,
            years: prediction.years,
            headline: prediction.headline,
            advisory: prediction.advisory.is_some(),
        },
        Err(err) => EventKind::PredictionFailed {
            code: err.code(),
            message: err.to_string(),
        },
    };
    logger.log(event);
}

fn present(prediction: &TenurePrediction, json: bool) -> Result<()> {
    if json {
        return print_json(prediction);
    }
    let mut out = String::new();
    for banner in prediction.banners() {
        out.push_str(&render_banner(&banner));
        out.push('\n');
    }
    out.push_str(&prediction.details());
    write_stdout(&out)
}

fn render_banner(banner: &Banner) -> String {
    match banner.level {
        BannerLevel::Success => banner.message.green().bold().to_string(),
        BannerLevel::Warning => format!("{} {}", "warning:".yellow().bold(), banner.message),
        BannerLevel::Error => format!("{} {}", "error:".red().bold(), banner.message),
    }
}

fn write_failure<W: Write>(out: &mut W, err: &TenureError) -> io::Result<()> {
    writeln!(out, "{}", render_banner(&error_banner(err)))?;
    if let Some(details) = error_details(err) {
        write!(out, "{details}")?;
    }
    out.flush()
}

// ──────────────────── record input ────────────────────

fn print_form_header() {
    println!("{}", "Employee Service Duration Prediction".bold());
    println!("Predicts YearsAtCompany with the trained gradient boosting model.");
    println!("Press Enter to accept the value in parentheses.");
}

fn gather_record(args: &InputArgs) -> Result<FeatureRecord> {
    let base = match &args.input {
        Some(path) => FeatureRecord::from_toml_file(path)?,
        None if args.defaults => form::default_record(),
        None => {
            print_form_header();
            FormSession::new(io::stdin().lock(), io::stdout()).collect()?
        }
    };
    finish_record(base, args)
}

/// Apply `--set` overrides, then the form bounds unless the record came from
/// a file.
fn finish_record(mut record: FeatureRecord, args: &InputArgs) -> Result<FeatureRecord> {
    for assignment in &args.assignments {
        record.apply_assignment(assignment)?;
    }
    if args.input.is_none() {
        form::check_bounds(&record)?;
    }
    Ok(record)
}

// ──────────────────── encode / options / check ────────────────────

fn run_encode(args: &InputArgs) -> Result<()> {
    let record = gather_record(args)?;
    let features = FeatureEncoder::default().encode(&record)?;
    if args.json {
        return print_json(&serde_json::json!({ "features": features.named() }));
    }
    print!("{}", format_feature_table(&features.named()));
    Ok(())
}

#[derive(Serialize)]
struct OptionsReport {
    categories: BTreeMap<&'static str, BTreeMap<&'static str, u32>>,
    max_values: BTreeMap<&'static str, f64>,
    tenure_max_years: f64,
}

fn options_report() -> OptionsReport {
    let tables = catalog();
    OptionsReport {
        categories: tables
            .categories()
            .map(|table| (table.feature().column(), table.entries().collect()))
            .collect(),
        max_values: tables
            .max_values()
            .map(|(feature, max)| (feature.column(), max))
            .collect(),
        tenure_max_years: TENURE_MAX_YEARS,
    }
}

fn run_options(json: bool) -> Result<()> {
    if json {
        return print_json(&options_report());
    }
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Categorical codes".bold()));
    for table in catalog().categories() {
        let codes: Vec<String> = table
            .entries()
            .map(|(option, code)| format!("{option}={code}"))
            .collect();
        out.push_str(&format!("  {}: {}\n", table.feature(), codes.join(", ")));
    }
    out.push_str(&format!("{}\n", "Rescale maxima".bold()));
    for (feature, max) in catalog().max_values() {
        out.push_str(&format!("  {feature}: {max}\n"));
    }
    out.push_str(&format!("  YearsAtCompany (output): {TENURE_MAX_YEARS}\n"));
    write_stdout(&out)
}

#[derive(Serialize)]
struct CheckReport<'a> {
    model: &'a ArtifactInfo,
    scaler: &'a ArtifactInfo,
    model_summary: String,
}

fn run_check(config: &Config, json: bool) -> Result<()> {
    let artifacts = load_artifacts(&config.artifact_paths())?;
    let report = CheckReport {
        model: &artifacts.model_info,
        scaler: &artifacts.scaler_info,
        model_summary: artifacts.model.summary(),
    };
    if json {
        return print_json(&report);
    }
    let mut out = String::new();
    for info in [report.scaler, report.model] {
        out.push_str(&format!(
            "  {} {} {} ({} bytes, sha256 {})\n",
            "[ OK ]".green(),
            info.role,
            info.path.display(),
            info.bytes,
            info.sha256
        ));
    }
    out.push_str(&format!("  model: {}\n", report.model_summary));
    write_stdout(&out)
}

// ──────────────────── output helpers ────────────────────

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    write_stdout(&line)
}

fn write_stdout(text: &str) -> Result<()> {
    io::stdout()
        .lock()
        .write_all(text.as_bytes())
        .map_err(|err| TenureError::io("<stdout>", err))
}
