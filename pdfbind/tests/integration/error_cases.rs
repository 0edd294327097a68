//! Integration tests for error handling and edge cases.

use lopdf::Object;
use pdfbind::config::OverwriteMode;
use pdfbind::error::PdfBindError;
use pdfbind::merge::{CandidateStatus, MergeOutcome, Merger};
use rstest::rstest;

use crate::common::{Workspace, merge, page_signatures};

#[test]
fn test_missing_input_directory() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.input_dir = ws.root().join("does-not-exist");

    let result = Merger::new().run(&config);

    assert!(matches!(result, Err(PdfBindError::DirectoryNotFound { .. })));
    assert!(!ws.output.exists());
}

#[test]
fn test_input_is_a_file() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.input_dir = ws.pdf("a.pdf", 1);

    let result = Merger::new().run(&config);

    assert!(matches!(result, Err(PdfBindError::DirectoryNotFound { .. })));
}

#[test]
fn test_empty_directory_writes_nothing() {
    let ws = Workspace::new();

    let outcome = Merger::new().run(&ws.config()).unwrap();

    assert!(matches!(outcome, MergeOutcome::EmptyInput { .. }));
    assert!(!ws.output.exists());
}

#[test]
fn test_directory_without_candidates_writes_nothing() {
    let ws = Workspace::new();
    ws.file("readme.md", b"# files");
    ws.file("photo.gif", b"GIF89a");

    let outcome = Merger::new().run(&ws.config()).unwrap();

    assert!(matches!(outcome, MergeOutcome::EmptyInput { .. }));
    assert!(!ws.output.exists());
}

#[rstest]
#[case("b.pdf", b"this is not a pdf".as_slice())]
#[case("b.png", b"\x89PNG\r\n\x1a\n garbage".as_slice())]
#[case("b.jpg", b"\xff\xd8\xff\xe0 truncated".as_slice())]
fn test_broken_candidate_is_skipped(#[case] name: &str, #[case] contents: &[u8]) {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 1);
    ws.file(name, contents);
    ws.image("c.png", 20, 10);

    let report = merge(&ws.config());

    assert_eq!(report.statistics.succeeded, 2);
    assert_eq!(report.statistics.failed, 1);
    assert_eq!(
        page_signatures(&ws.output),
        vec!["a.pdf p1", "image 20x10"]
    );

    let failed: Vec<&str> = report
        .failures()
        .map(|o| o.candidate.file_name.as_str())
        .collect();
    assert_eq!(failed, vec![name]);
}

#[test]
fn test_failure_reason_is_reported() {
    let ws = Workspace::new();
    ws.file("broken.pdf", b"nope");

    let report = merge(&ws.config());

    match &report.outcomes[0].status {
        CandidateStatus::Failed { error } => assert!(error.contains("broken.pdf")),
        other => panic!("Expected a failure, got {other:?}"),
    }
}

#[test]
fn test_image_with_pdf_suffix_is_skipped() {
    let ws = Workspace::new();
    ws.image("picture.png", 4, 4);
    std::fs::rename(ws.input.join("picture.png"), ws.input.join("picture.pdf")).unwrap();
    ws.pdf("z.pdf", 1);

    let report = merge(&ws.config());

    assert_eq!(report.statistics.failed, 1);
    assert_eq!(page_signatures(&ws.output), vec!["z.pdf p1"]);
}

#[test]
fn test_uncopyable_page_skips_whole_pdf() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 1);
    ws.pdf_with("b.pdf", 3, |doc, n, page| {
        if n == 2 {
            let not_a_stream = doc.add_object(Object::Integer(7));
            page.set("Contents", not_a_stream);
        }
    });
    ws.image("c.png", 30, 20);

    let report = merge(&ws.config());

    assert_eq!(report.statistics.succeeded, 2);
    assert_eq!(report.statistics.failed, 1);
    assert_eq!(report.statistics.total_pages, 2);
    assert_eq!(page_signatures(&ws.output), vec!["a.pdf p1", "image 30x20"]);

    match &report.outcomes[1].status {
        CandidateStatus::Failed { error } => {
            assert!(error.contains("b.pdf"));
            assert!(error.contains("page 2"));
        }
        other => panic!("Expected b.pdf to fail, got {other:?}"),
    }
}

#[test]
fn test_dangling_references_keep_every_page() {
    let ws = Workspace::new();
    ws.pdf_with("a.pdf", 3, |_, n, page| {
        if n == 3 {
            page.set("Annots", vec![Object::Reference((9999, 0))]);
        }
    });
    ws.image("b.png", 10, 10);

    let report = merge(&ws.config());

    assert_eq!(report.statistics.failed, 0);
    assert_eq!(
        report.outcomes[0].status,
        CandidateStatus::Merged { pages: 3 }
    );
    assert_eq!(
        page_signatures(&ws.output),
        vec!["a.pdf p1", "a.pdf p2", "a.pdf p3", "image 10x10"]
    );
}

#[test]
fn test_all_candidates_failing_still_writes_output() {
    let ws = Workspace::new();
    ws.file("a.pdf", b"garbage");
    ws.file("b.png", b"garbage");

    let report = merge(&ws.config());

    assert_eq!(report.statistics.total_pages, 0);
    assert_eq!(report.statistics.failed, 2);
    assert!(ws.output.exists());
    assert!(page_signatures(&ws.output).is_empty());
}

#[test]
fn test_zero_page_pdf_contributes_nothing() {
    let ws = Workspace::new();
    ws.pdf("empty.pdf", 0);
    ws.pdf("full.pdf", 1);

    let report = merge(&ws.config());

    assert_eq!(report.statistics.failed, 0);
    assert_eq!(
        report.outcomes[0].status,
        CandidateStatus::Merged { pages: 0 }
    );
    assert_eq!(page_signatures(&ws.output), vec!["full.pdf p1"]);
}

#[test]
fn test_no_clobber_keeps_existing_output() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 1);
    std::fs::write(&ws.output, b"precious").unwrap();

    let mut config = ws.config();
    config.overwrite_mode = OverwriteMode::NoClobber;
    let result = Merger::new().run(&config);

    assert!(matches!(result, Err(PdfBindError::OutputExists { .. })));
    assert_eq!(std::fs::read(&ws.output).unwrap(), b"precious");
}

#[test]
fn test_existing_output_is_replaced_by_default() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 1);
    std::fs::write(&ws.output, b"stale").unwrap();

    merge(&ws.config());

    assert_eq!(page_signatures(&ws.output), vec!["a.pdf p1"]);
}

#[test]
fn test_output_inside_input_directory_is_rejected() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 1);

    let mut config = ws.config();
    config.output = ws.input.join("merged_output.pdf");
    let result = Merger::new().run(&config);

    assert!(matches!(result, Err(PdfBindError::InvalidConfig { .. })));
    assert!(!config.output.exists());
}

#[test]
fn test_missing_output_directory_is_created() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 1);

    let mut config = ws.config();
    config.output = ws.root().join("out").join("deep").join("merged.pdf");
    merge(&config);

    assert!(config.output.exists());
}

#[cfg(unix)]
#[test]
fn test_unwritable_output_is_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let ws = Workspace::new();
    ws.pdf("a.pdf", 1);
    let locked = ws.root().join("locked");
    std::fs::create_dir(&locked).unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o500)).unwrap();

    // Permission bits do not stop root.
    let probe = locked.join("probe");
    if std::fs::write(&probe, b"").is_ok() {
        std::fs::remove_file(&probe).unwrap();
        return;
    }

    let mut config = ws.config();
    config.output = locked.join("merged.pdf");
    let err = Merger::new().run(&config).unwrap_err();

    assert!(matches!(err, PdfBindError::OutputWriteError { .. }));
    assert_eq!(err.exit_code(), 5);
    assert!(!config.output.exists());
}
