//! PDF reading and loading operations.
//!
//! A [`LoadedPdf`] owns the parsed source document for as long as its pages
//! are being copied. It is dropped as soon as the caller is done with it, so
//! at most one source is held in memory at a time.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::io::reader::PdfReader;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("document.pdf"))?;
//! println!("Loaded {} pages in {:?}", loaded.page_count, loaded.load_time);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{PdfBindError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages, read once at load time.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,
}

impl LoadedPdf {
    fn new(document: Document, path: PathBuf, load_time: Duration) -> Self {
        let page_count = document.get_pages().len();

        Self {
            document,
            path,
            page_count,
            load_time,
        }
    }
}

/// Opens source PDFs read-only.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::EncryptedPdf`] if the document is protected by
    /// a password, and [`PdfBindError::SourceOpenError`] if the file cannot be
    /// read or parsed.
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let start = Instant::now();

        let doc = Document::load(path).map_err(|e| {
            let err_msg = e.to_string();
            let lower = err_msg.to_lowercase();
            if lower.contains("encrypt") || lower.contains("password") {
                PdfBindError::encrypted_pdf(path)
            } else {
                PdfBindError::source_open(path, err_msg)
            }
        })?;

        Ok(LoadedPdf::new(doc, path.to_path_buf(), start.elapsed()))
    }

    /// Count the pages of a PDF without keeping it open.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn page_count(&self, path: &Path) -> Result<usize> {
        self.load(path).map(|loaded| loaded.page_count)
    }
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
