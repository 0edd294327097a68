//! Integration tests for dry-run planning.

use pdfbind::merge::{MergeOutcome, MergePlan, Merger, PlannedAction};

use crate::common::{Workspace, merge};

fn plan(ws: &Workspace) -> MergePlan {
    let mut config = ws.config();
    config.dry_run = true;

    match Merger::new().run(&config).unwrap() {
        MergeOutcome::DryRun(plan) => plan,
        other => panic!("Expected a dry run, got {other:?}"),
    }
}

#[test]
fn test_dry_run_writes_nothing() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 2);
    ws.image("b.png", 10, 10);

    let plan = plan(&ws);

    assert_eq!(plan.total_pages, 3);
    assert!(!plan.output_exists);
    assert!(!ws.output.exists());
}

#[test]
fn test_dry_run_matches_real_run() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 3);
    ws.image("b.jpg", 40, 30);
    ws.file("c.png", b"broken");
    ws.pdf("d.pdf", 1);

    let plan = plan(&ws);
    let report = merge(&ws.config());

    assert_eq!(plan.total_pages, report.statistics.total_pages);
    let planned: Vec<(&str, usize)> = plan
        .candidates
        .iter()
        .map(|c| (c.candidate.file_name.as_str(), c.action.pages()))
        .collect();
    let merged: Vec<(&str, usize)> = report
        .outcomes
        .iter()
        .map(|o| (o.candidate.file_name.as_str(), o.pages()))
        .collect();
    assert_eq!(planned, merged);
}

#[test]
fn test_dry_run_describes_each_candidate() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 2);
    ws.image("b.png", 100, 200);
    ws.file("c.pdf", b"not a pdf");

    let plan = plan(&ws);

    assert_eq!(plan.candidates.len(), 3);
    assert_eq!(plan.candidates[0].action, PlannedAction::CopyPages { pages: 2 });

    let PlannedAction::PlaceImage {
        width,
        height,
        placement,
    } = &plan.candidates[1].action
    else {
        panic!("Expected an image placement");
    };
    assert_eq!((*width, *height), (100, 200));
    assert!((placement.scaled_height - 792.0).abs() < 0.01);

    assert!(matches!(
        plan.candidates[2].action,
        PlannedAction::Skip { .. }
    ));
}

#[test]
fn test_dry_run_reports_existing_output() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 1);
    std::fs::write(&ws.output, b"old").unwrap();

    let plan = plan(&ws);

    assert!(plan.output_exists);
    assert_eq!(std::fs::read(&ws.output).unwrap(), b"old");
}

#[test]
fn test_dry_run_on_empty_directory() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.dry_run = true;

    let outcome = Merger::new().run(&config).unwrap();

    assert!(matches!(outcome, MergeOutcome::EmptyInput { .. }));
}
