// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — batch PDF image extraction and clean-up.
//
// Entry point. Initialises logging, resolves the run configuration, and
// processes every PDF in the target folder.

mod args;

use std::process::ExitCode;

use bildwerk_core::RunConfig;
use bildwerk_core::error::Result;
use bildwerk_extract::{Pdfimages, process_directory};
use clap::Parser;

use args::Cli;

fn main() -> ExitCode {
    // Diagnostics share stdout with progress lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Run aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(warning) = cli.apply(&mut config) {
        tracing::warn!("{warning}");
    }
    tracing::info!("{} {}", config.min_width, config.min_height);

    let extractor = Pdfimages::new(config.extractor_program.clone());
    let report = process_directory(&cli.dir, &config, &extractor)?;

    if let Some(path) = &cli.report {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!(path = %path.display(), "Report written");
    }
    Ok(())
}
