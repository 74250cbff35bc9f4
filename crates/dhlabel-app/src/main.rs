// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DHLabel — combine carrier shipping labels into print-ready A4 sheets.
//
// Entry point: parses arguments, initialises tracing, runs one
// consolidation and maps the outcome to an exit code.

mod cli;
mod progress;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dhlabel_core::config::{LayoutConfig, RunConfig};
use dhlabel_core::error::Result;
use dhlabel_core::human_errors::humanize_error;
use dhlabel_document::{RunOptions, RunSummary, consolidate};

use cli::Cli;
use progress::{ConsoleProgress, print_summary};

const EXIT_FATAL: u8 = 1;
const EXIT_PARTIAL: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(summary) if summary.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_PARTIAL),
        Err(err) => {
            tracing::error!(error = %err, "run aborted");
            let human = humanize_error(&err);
            eprintln!("Error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            eprintln!("  ({err})");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let today = chrono::Local::now().date_naive();
    let cwd = std::env::current_dir()?;
    let input = cli.input_path.clone().unwrap_or_else(|| cwd.clone());
    let output = cli.output_path.clone().unwrap_or(cwd);

    let mut config = RunConfig::new(input, output, today);
    if let Some(name) = &cli.name {
        config = config.with_base_name(name.clone());
    }
    let layout = match &cli.layout {
        Some(path) => LayoutConfig::from_json_file(path)?,
        None => LayoutConfig::default(),
    };

    print_banner(&config);
    tracing::info!(?layout, "layout loaded");

    let options = RunOptions {
        date: today,
        dry_run: cli.dry_run,
    };
    let summary = consolidate(&config, &layout, &options, &mut ConsoleProgress)?;
    print_summary(&summary, cli.dry_run);
    Ok(summary)
}

fn print_banner(config: &RunConfig) {
    println!("DHLabel {}", env!("CARGO_PKG_VERSION"));
    println!("Input:  {}", absolute(&config.input_path).display());
    println!("Output: {}", absolute(&config.output_path).display());
    println!();
}

fn absolute(path: &std::path::Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
