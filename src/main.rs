//! `tenure` binary entry point.

use clap::Parser;
use tenure_predictor::cli_app::{Cli, report_error, run};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        report_error(&err);
        std::process::exit(1);
    }
}
