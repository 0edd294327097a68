//! Integration tests for merging directories of PDFs and images.

use pdfbind::config::CompressionLevel;
use pdfbind::layout::PageSize;
use pdfbind::merge::CandidateStatus;
use rstest::rstest;

use crate::common::{Workspace, media_box, merge, page_signatures};

#[test]
fn test_pdf_and_images_in_name_order() {
    let ws = Workspace::new();
    ws.image("b.png", 100, 200);
    ws.pdf("a.pdf", 2);
    ws.image("c.jpg", 300, 100);

    let report = merge(&ws.config());

    assert_eq!(report.statistics.total_pages, 4);
    assert_eq!(report.statistics.succeeded, 3);
    assert_eq!(report.statistics.failed, 0);
    assert_eq!(
        page_signatures(&ws.output),
        vec!["a.pdf p1", "a.pdf p2", "image 100x200", "image 300x100"]
    );
}

#[test]
fn test_single_pdf_keeps_page_order() {
    let ws = Workspace::new();
    ws.pdf("doc.pdf", 5);

    let report = merge(&ws.config());

    assert_eq!(report.statistics.total_pages, 5);
    let expected: Vec<String> = (1..=5).map(|n| format!("doc.pdf p{n}")).collect();
    assert_eq!(page_signatures(&ws.output), expected);
}

#[test]
fn test_ordering_ignores_letter_case() {
    let ws = Workspace::new();
    ws.pdf("B.pdf", 1);
    ws.pdf("a.pdf", 1);
    ws.image("C.PNG", 10, 10);

    merge(&ws.config());

    assert_eq!(
        page_signatures(&ws.output),
        vec!["a.pdf p1", "B.pdf p1", "image 10x10"]
    );
}

#[test]
fn test_digits_sort_lexicographically() {
    let ws = Workspace::new();
    ws.pdf("10.pdf", 1);
    ws.pdf("2.pdf", 1);
    ws.pdf("1.pdf", 1);

    merge(&ws.config());

    assert_eq!(
        page_signatures(&ws.output),
        vec!["1.pdf p1", "10.pdf p1", "2.pdf p1"]
    );
}

#[test]
fn test_non_candidates_are_ignored() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 1);
    ws.file("notes.txt", b"hello");
    ws.file("archive.pdf.bak", b"old");
    std::fs::create_dir(ws.input.join("nested")).unwrap();
    ws.pdf_with_size("nested/inner.pdf", 1, 100, 100);

    let report = merge(&ws.config());

    assert_eq!(report.statistics.candidates, 1);
    assert_eq!(page_signatures(&ws.output), vec!["a.pdf p1"]);
}

#[test]
fn test_source_page_size_is_preserved() {
    let ws = Workspace::new();
    ws.pdf_with_size("wide.pdf", 1, 842, 595);
    ws.image("z.png", 10, 10);

    merge(&ws.config());

    assert_eq!(media_box(&ws.output, 1), vec![0.0, 0.0, 842.0, 595.0]);
    assert_eq!(media_box(&ws.output, 2), vec![0.0, 0.0, 595.0, 842.0]);
}

#[test]
fn test_custom_page_size_for_images() {
    let ws = Workspace::new();
    ws.image("a.png", 10, 10);

    let mut config = ws.config();
    config.page_size = PageSize::LETTER;
    merge(&config);

    assert_eq!(media_box(&ws.output, 1), vec![0.0, 0.0, 612.0, 792.0]);
}

#[test]
fn test_transparent_png() {
    let ws = Workspace::new();
    ws.transparent_png("alpha.png", 8, 4);

    let report = merge(&ws.config());

    assert_eq!(report.statistics.total_pages, 1);
    assert_eq!(page_signatures(&ws.output), vec!["image 8x4"]);
}

#[test]
fn test_repeated_runs_are_identical() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 2);
    ws.image("b.png", 30, 20);

    merge(&ws.config());
    let first = page_signatures(&ws.output);

    merge(&ws.config());
    let second = page_signatures(&ws.output);

    assert_eq!(first, second);
}

#[test]
fn test_same_pdf_twice_under_different_names() {
    let ws = Workspace::new();
    let original = ws.pdf("a.pdf", 2);
    std::fs::copy(&original, ws.input.join("b.pdf")).unwrap();

    let report = merge(&ws.config());

    assert_eq!(report.statistics.total_pages, 4);
    assert_eq!(
        page_signatures(&ws.output),
        vec!["a.pdf p1", "a.pdf p2", "a.pdf p1", "a.pdf p2"]
    );
}

#[rstest]
#[case(CompressionLevel::None)]
#[case(CompressionLevel::Standard)]
#[case(CompressionLevel::Maximum)]
fn test_compression_levels(#[case] compression: CompressionLevel) {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 3);
    ws.image("b.png", 64, 64);

    let mut config = ws.config();
    config.compression = compression;
    let report = merge(&config);

    assert_eq!(report.statistics.total_pages, 4);
    assert!(report.statistics.output_size > 0);
    assert_eq!(
        report.statistics.compressed,
        compression != CompressionLevel::None
    );

    let doc = lopdf::Document::load(&ws.output).unwrap();
    assert_eq!(doc.get_pages().len(), 4);
}

#[test]
fn test_report_lists_every_candidate() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 2);
    ws.image("b.jpeg", 5, 5);

    let report = merge(&ws.config());

    let statuses: Vec<(&str, &CandidateStatus)> = report
        .outcomes
        .iter()
        .map(|o| (o.candidate.file_name.as_str(), &o.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("a.pdf", &CandidateStatus::Merged { pages: 2 }),
            ("b.jpeg", &CandidateStatus::Merged { pages: 1 }),
        ]
    );
}
