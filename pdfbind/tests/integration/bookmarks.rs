//! Integration tests for bookmarks and document metadata.

use lopdf::{Document, Object, ObjectId};
use pdfbind::config::Metadata;
use pdfbind::merge::metadata::{MetadataManager, decode_text_string};

use crate::common::{Workspace, merge};

/// Outline entries as (title, page number).
fn outline(doc: &Document) -> Vec<(String, u32)> {
    let page_numbers: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();
    let number_of = |id: ObjectId| {
        page_numbers
            .iter()
            .find(|(_, page)| *page == id)
            .map(|(n, _)| *n)
            .expect("Bookmark points at an unknown page")
    };

    let Ok(outlines) = doc
        .catalog()
        .and_then(|c| c.get(b"Outlines"))
        .and_then(Object::as_reference)
    else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    let mut next = doc
        .get_dictionary(outlines)
        .and_then(|o| o.get(b"First"))
        .and_then(Object::as_reference)
        .ok();
    while let Some(id) = next {
        let item = doc.get_dictionary(id).unwrap();
        let title = decode_text_string(item.get(b"Title").unwrap()).unwrap();
        let page = item.get(b"Dest").unwrap().as_array().unwrap()[0]
            .as_reference()
            .unwrap();
        entries.push((title, number_of(page)));
        next = item.get(b"Next").and_then(Object::as_reference).ok();
    }
    entries
}

#[test]
fn test_bookmark_per_merged_file() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 3);
    ws.image("b.png", 10, 10);
    ws.pdf("c.pdf", 2);

    let mut config = ws.config();
    config.bookmarks = true;
    let report = merge(&config);

    assert_eq!(report.statistics.bookmarks_added, 3);
    let doc = Document::load(&ws.output).unwrap();
    assert_eq!(
        outline(&doc),
        vec![
            ("a.pdf".to_string(), 1),
            ("b.png".to_string(), 4),
            ("c.pdf".to_string(), 5),
        ]
    );
}

#[test]
fn test_failed_and_empty_files_get_no_bookmark() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 1);
    ws.file("b.pdf", b"broken");
    ws.pdf("c.pdf", 0);
    ws.image("d.png", 10, 10);

    let mut config = ws.config();
    config.bookmarks = true;
    merge(&config);

    let doc = Document::load(&ws.output).unwrap();
    assert_eq!(
        outline(&doc),
        vec![("a.pdf".to_string(), 1), ("d.png".to_string(), 2)]
    );
}

#[test]
fn test_no_bookmarks_by_default() {
    let ws = Workspace::new();
    ws.pdf("a.pdf", 1);

    let report = merge(&ws.config());

    assert_eq!(report.statistics.bookmarks_added, 0);
    let doc = Document::load(&ws.output).unwrap();
    assert!(outline(&doc).is_empty());
}

#[test]
fn test_metadata_is_written() {
    let ws = Workspace::new();
    ws.image("a.png", 10, 10);

    let mut config = ws.config();
    config.metadata = Metadata::new(
        Some("Scanned receipts".to_string()),
        Some("Zoë".to_string()),
        None,
        Some("receipts, 2024".to_string()),
    );
    merge(&config);

    let doc = Document::load(&ws.output).unwrap();
    let metadata = MetadataManager::new().get_metadata(&doc);
    assert_eq!(metadata, config.metadata);
}
