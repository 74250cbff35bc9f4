// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::path::PathBuf;

use clap::Parser;

/// Combine carrier shipping labels into two-up A4 sheets and append their
/// tracking numbers to a CSV report.
#[derive(Debug, Parser)]
#[command(name = "dhlabel", about, version)]
pub struct Cli {
    /// Directory containing the label PDFs. Default: current directory
    #[arg(value_name = "INPUT_DIR")]
    pub input_path: Option<PathBuf>,

    /// Directory receiving the combined PDF and the CSV report. Default: current directory
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_path: Option<PathBuf>,

    /// JSON file overriding label geometry and text constants
    #[arg(long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// Output file name without extension. Default: DHLabels_<YYYY-MM-DD>
    #[arg(long, value_name = "BASE")]
    pub name: Option<String>,

    /// Read and report the labels without writing any output
    #[arg(long)]
    pub dry_run: bool,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
