//! PDF writing and saving operations.
//!
//! This module provides safe PDF writing with:
//! - Atomic writes (write to temp file, then rename)
//! - Compression support
//! - Creation of missing output directories
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! let stats = writer.save_with_stats(doc, Path::new("output.pdf"))?;
//! println!("Wrote {}", stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::CompressionLevel;
use crate::error::{PdfBindError, Result};
use crate::io::reader::format_file_size;

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Compress streams before writing.
    pub compress: bool,

    /// Drop unreferenced objects and renumber the rest.
    pub optimize: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            optimize: false,
            buffer_size: 8192,
        }
    }
}

impl WriteOptions {
    /// Options matching a compression level.
    pub fn from_compression(level: CompressionLevel) -> Self {
        let (compress, optimize) = match level {
            CompressionLevel::None => (false, false),
            CompressionLevel::Standard => (true, false),
            CompressionLevel::Maximum => (true, true),
        };

        Self {
            compress,
            optimize,
            ..Self::default()
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Whether compression was applied.
    pub compressed: bool,

    /// Whether optimization was applied.
    pub optimized: bool,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Save a PDF document to a file.
    ///
    /// # Errors
    ///
    /// See [`save_with_stats`](Self::save_with_stats).
    pub fn save(&self, doc: Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).map(|_| ())
    }

    /// Save a PDF and return statistics about the operation.
    ///
    /// Missing parent directories are created. With atomic writes enabled,
    /// the document is first written next to the target as `<name>.tmp` and
    /// then renamed over it, so an interrupted write never leaves a
    /// truncated output behind.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::OutputWriteError`] if the directory cannot be
    /// created or the file cannot be written or renamed.
    pub fn save_with_stats(&self, mut doc: Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();

        if self.options.optimize {
            doc.prune_objects();
            doc.renumber_objects();
        }
        if self.options.compress {
            doc.compress();
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PdfBindError::output_write(parent, e))?;
        }

        let write_path = if self.options.atomic {
            temp_path(path)
        } else {
            path.to_path_buf()
        };

        if let Err(err) = self.write_file(&mut doc, &write_path) {
            if self.options.atomic {
                let _ = fs::remove_file(&write_path);
            }
            return Err(err);
        }

        if self.options.atomic {
            fs::rename(&write_path, path).map_err(|e| {
                let _ = fs::remove_file(&write_path);
                PdfBindError::output_write(path, e)
            })?;
        }

        let file_size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let write_time = start.elapsed();

        debug!(
            path = %path.display(),
            bytes = file_size,
            ?write_time,
            "wrote output document"
        );

        Ok(WriteStatistics {
            write_time,
            file_size,
            output_path: path.to_path_buf(),
            compressed: self.options.compress,
            optimized: self.options.optimize,
        })
    }

    fn write_file(&self, doc: &mut Document, path: &Path) -> Result<()> {
        let file = fs::File::create(path).map_err(|e| PdfBindError::output_write(path, e))?;
        let mut writer = io::BufWriter::with_capacity(self.options.buffer_size, file);

        doc.save_to(&mut writer)
            .map_err(|e| PdfBindError::output_write(path, io::Error::other(e)))?;

        writer
            .flush()
            .map_err(|e| PdfBindError::output_write(path, e))
    }

    /// Check if a file can be written to the given path.
    ///
    /// Performs pre-flight checks without writing. A missing parent directory
    /// is fine as long as it can be created by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::OutputWriteError`] if the path names a
    /// directory or its nearest existing ancestor is read-only or not a
    /// directory.
    pub fn can_write(&self, path: &Path) -> Result<()> {
        let refuse = |kind: io::ErrorKind, reason: String| -> Result<()> {
            Err(PdfBindError::output_write(path, io::Error::new(kind, reason)))
        };

        if path.is_dir() {
            return refuse(io::ErrorKind::IsADirectory, "output path is a directory".into());
        }

        let Some(ancestor) = path.ancestors().skip(1).find(|p| p.exists()) else {
            return Ok(());
        };

        let metadata = fs::metadata(ancestor).map_err(|e| PdfBindError::output_write(path, e))?;
        if !metadata.is_dir() {
            return refuse(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", ancestor.display()),
            );
        }
        if metadata.permissions().readonly() {
            return refuse(
                io::ErrorKind::PermissionDenied,
                format!("{} is not writable", ancestor.display()),
            );
        }

        Ok(())
    }

    /// Check if output file exists.
    pub fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}
