//! PDF metadata management.
//!
//! This module handles the document Info dictionary:
//! - Title, Author, Subject, Keywords
//! - Creator, Producer
//! - Creation and modification dates

use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Document, Object, StringFormat};

use crate::config::Metadata;

/// Name written as Creator and Producer.
pub const PRODUCER: &str = concat!("pdfbind ", env!("CARGO_PKG_VERSION"));

/// Manager for PDF metadata.
#[derive(Debug, Clone, Default)]
pub struct MetadataManager;

impl MetadataManager {
    /// Create a new metadata manager.
    pub fn new() -> Self {
        Self
    }

    /// Write the Info dictionary of `doc`.
    ///
    /// Producer, Creator and the creation and modification dates are always
    /// set. Title, Author, Subject and Keywords are set when present in
    /// `metadata`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pdfbind::merge::metadata::MetadataManager;
    /// # use pdfbind::config::Metadata;
    /// # use lopdf::Document;
    /// let mut doc = Document::with_version("1.5");
    /// let manager = MetadataManager::new();
    /// let metadata = Metadata::new(Some("Scans".to_string()), None, None, None);
    /// manager.set_metadata(&mut doc, &metadata);
    ///
    /// assert_eq!(manager.get_metadata(&doc).title.as_deref(), Some("Scans"));
    /// ```
    pub fn set_metadata(&self, doc: &mut Document, metadata: &Metadata) {
        self.set_metadata_at(doc, metadata, Utc::now());
    }

    fn set_metadata_at(&self, doc: &mut Document, metadata: &Metadata, now: DateTime<Utc>) {
        let mut info = Dictionary::new();

        let fields = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Keywords", &metadata.keywords),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                info.set(key, text_string(value));
            }
        }

        info.set("Creator", text_string(PRODUCER));
        info.set("Producer", text_string(PRODUCER));

        let date = format_pdf_date(now);
        info.set("CreationDate", text_string(&date));
        info.set("ModDate", text_string(&date));

        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);
    }

    /// Get metadata from a document.
    pub fn get_metadata(&self, doc: &Document) -> Metadata {
        let Some(info) = self.info_dictionary(doc) else {
            return Metadata::default();
        };

        let field = |key: &[u8]| info.get(key).ok().and_then(decode_text_string);

        Metadata::new(
            field(b"Title"),
            field(b"Author"),
            field(b"Subject"),
            field(b"Keywords"),
        )
    }

    /// Check if a document has an Info dictionary.
    pub fn has_metadata(&self, doc: &Document) -> bool {
        self.info_dictionary(doc).is_some()
    }

    fn info_dictionary<'a>(&self, doc: &'a Document) -> Option<&'a Dictionary> {
        let info_id = doc.trailer.get(b"Info").and_then(Object::as_reference).ok()?;
        doc.get_dictionary(info_id).ok()
    }
}

/// Encode `text` as a PDF text string.
///
/// ASCII is written as a literal string; anything else as UTF-16BE with a
/// byte order mark.
pub fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        Object::String(text.as_bytes().to_vec(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

/// Decode a PDF text string written by [`text_string`] or by other producers.
pub fn decode_text_string(object: &Object) -> Option<String> {
    let Object::String(bytes, _) = object else {
        return None;
    };

    match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        None => Some(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Format a timestamp as a PDF date string (`D:YYYYMMDDHHmmSSZ`).
fn format_pdf_date(time: DateTime<Utc>) -> String {
    time.format("D:%Y%m%d%H%M%SZ").to_string()
}
