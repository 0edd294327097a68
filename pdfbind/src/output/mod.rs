//! Output formatting and display for pdfbind.
//!
//! This module handles all user-facing output:
//! - Status messages in quiet and verbose modes
//! - A progress bar for the merge loop
//! - Summaries of merge reports and dry-run plans
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::output::OutputFormatter;
//! use pdfbind::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge");
//! formatter.success("Merge completed");
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::ProgressBar;

use crate::merge::{CandidateOutcome, CandidateStatus, MergePlan, MergeReport, PlannedAction};

/// Display the result of a merge.
///
/// Every file is listed in merge order: merged files with their page count,
/// skipped files as a warning with the reason. A one-line summary follows.
pub fn display_report(formatter: &OutputFormatter, report: &MergeReport) {
    let stats = &report.statistics;

    formatter.section(&format!("Processed {} file(s):", stats.candidates));
    for outcome in &report.outcomes {
        let line = outcome_line(outcome);
        if outcome.is_merged() {
            formatter.list_item(&line);
        } else {
            formatter.warning(&line);
        }
    }

    formatter.success(&format!(
        "Merged {} of {} file(s) into {} ({} pages, {})",
        stats.succeeded,
        stats.candidates,
        report.output.display(),
        stats.total_pages,
        stats.format_output_size()
    ));

    formatter.detail("Input size", &stats.format_input_size());
    formatter.detail(
        "Merge time",
        &format!("{:.2}s", stats.merge_time.as_secs_f64()),
    );
    formatter.detail(
        "Write time",
        &format!("{:.2}s", stats.write_time.as_secs_f64()),
    );
    if stats.bookmarks_added > 0 {
        formatter.detail("Bookmarks", &stats.bookmarks_added.to_string());
    }
}

/// One line describing what happened to a file.
pub fn outcome_line(outcome: &CandidateOutcome) -> String {
    let name = &outcome.candidate.file_name;
    match &outcome.status {
        CandidateStatus::Merged { pages } => format!("{name}: {pages} page(s)"),
        CandidateStatus::Failed { error } => format!("Skipped {name}: {error}"),
    }
}

/// Display what a dry run found.
pub fn display_plan(formatter: &OutputFormatter, plan: &MergePlan) {
    formatter.section("Dry run, nothing will be written:");

    for planned in &plan.candidates {
        let name = &planned.candidate.file_name;
        match &planned.action {
            PlannedAction::CopyPages { pages } => {
                formatter.list_item(&format!("{name}: copy {pages} page(s)"));
            }
            PlannedAction::PlaceImage {
                width,
                height,
                placement,
            } => formatter.list_item(&format!(
                "{name}: {width}x{height} image drawn at {:.1}x{:.1} pt",
                placement.scaled_width, placement.scaled_height
            )),
            PlannedAction::Skip { reason } => {
                formatter.warning(&format!("{name} would be skipped: {reason}"));
            }
        }
    }

    formatter.info(&format!(
        "Would write {} page(s) to {}",
        plan.total_pages,
        plan.output.display()
    ));
    if plan.output_exists {
        formatter.info("The output file exists and would be replaced");
    }
}
