//! pdfbind - Merge a directory of PDFs and images into a single PDF.

mod cli;

use std::process;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, ReportFormat};
use pdfbind::PdfBindError;
use pdfbind::merge::{MergeOutcome, Merger};
use pdfbind::output::{OutputFormatter, ProgressBar, display_plan, display_report};

fn main() {
    let cli = Cli::parse();

    init_tracing(&cli);

    if let Err(err) = run(&cli) {
        OutputFormatter::default().error(&format!("{err:#}"));
        process::exit(exit_code(&err));
    }
}

/// Diagnostics go to stderr. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.to_config()?;
    let json = cli.report == ReportFormat::Json;

    // JSON owns stdout.
    let formatter = if json {
        OutputFormatter::quiet()
    } else {
        OutputFormatter::from_config(&config)
    };

    formatter.info(&format!(
        "{} v{}: merging {}",
        pdfbind::NAME,
        pdfbind::VERSION,
        config.input_dir.display()
    ));

    let merger = Merger::new();
    let outcome = if config.dry_run {
        merger.plan(&config)?
    } else {
        let mut progress = if formatter.should_print() {
            ProgressBar::new(0)
        } else {
            ProgressBar::disabled()
        };
        merger.run_with_progress(&config, |event| progress.handle(&event))?
    };

    if json {
        let rendered = serde_json::to_string_pretty(&outcome).context("Failed to render report")?;
        println!("{rendered}");
        return Ok(());
    }

    match &outcome {
        MergeOutcome::Merged(report) => display_report(&formatter, report),
        MergeOutcome::DryRun(plan) => display_plan(&formatter, plan),
        MergeOutcome::EmptyInput { path } => formatter.warning(&format!(
            "No PDF or image files found in {}, nothing written",
            path.display()
        )),
    }

    Ok(())
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<PdfBindError>())
        .map(PdfBindError::exit_code)
        .unwrap_or(1)
}
