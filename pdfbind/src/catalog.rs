//! Discovery of merge candidates.
//!
//! [`FileCatalog`] looks at the direct children of an input directory, keeps
//! the regular files whose suffix marks them as a PDF or a supported image,
//! and returns them in a stable order: ascending by case-insensitive file
//! name, with exact byte order of the name breaking ties.
//!
//! Scanning never touches the filesystem beyond reading directory entries.

use std::cmp::Ordering;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::config::{DEFAULT_IMAGE_SUFFIXES, PDF_SUFFIX};
use crate::error::{PdfBindError, Result};

/// How a candidate is merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Every page is copied into the output.
    Pdf,
    /// Decoded and drawn on one new page.
    Image,
}

/// A file selected for merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFile {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// File name as displayed to the user.
    pub file_name: String,
    /// Merge strategy for this file.
    pub kind: FileKind,
    #[serde(skip)]
    raw_name: OsString,
}

impl CandidateFile {
    /// Create a candidate for `path`.
    pub fn new(path: impl Into<PathBuf>, kind: FileKind) -> Self {
        let path = path.into();
        let raw_name = path.file_name().map(OsString::from).unwrap_or_default();
        let file_name = raw_name.to_string_lossy().into_owned();
        Self {
            path,
            file_name,
            kind,
            raw_name,
        }
    }

    /// Total order used for merging.
    fn merge_order(&self, other: &Self) -> Ordering {
        self.file_name
            .to_lowercase()
            .cmp(&other.file_name.to_lowercase())
            .then_with(|| {
                self.raw_name
                    .as_encoded_bytes()
                    .cmp(other.raw_name.as_encoded_bytes())
            })
    }
}

/// Scans a directory for PDF and image files.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    image_suffixes: Vec<String>,
}

impl FileCatalog {
    /// Create a catalog recognising the given image suffixes.
    ///
    /// Suffixes include the leading dot and are compared case-insensitively.
    pub fn new<I, S>(image_suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            image_suffixes: image_suffixes
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Classify a file name by its suffix.
    pub fn classify(&self, file_name: &str) -> Option<FileKind> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(PDF_SUFFIX) {
            Some(FileKind::Pdf)
        } else if self.image_suffixes.iter().any(|s| lower.ends_with(s)) {
            Some(FileKind::Image)
        } else {
            None
        }
    }

    /// List merge candidates in `dir`, in merge order.
    ///
    /// Only direct children are considered. Directories, special files,
    /// broken symlinks and files with an unsupported suffix are skipped
    /// without error. A symlink to a regular file is a candidate.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::DirectoryNotFound`] if `dir` does not exist or
    /// is not a directory.
    pub fn scan(&self, dir: &Path) -> Result<Vec<CandidateFile>> {
        if !dir.is_dir() {
            return Err(PdfBindError::directory_not_found(dir));
        }
        let root = dir
            .canonicalize()
            .map_err(|_| PdfBindError::directory_not_found(dir))?;

        let mut candidates = Vec::new();

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    trace!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                trace!(path = %entry.path().display(), "skipping non-file entry");
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            match self.classify(&name) {
                Some(kind) => candidates.push(CandidateFile::new(entry.path(), kind)),
                None => trace!(file = %name, "skipping unsupported file"),
            }
        }

        candidates.sort_by(CandidateFile::merge_order);

        debug!(
            dir = %root.display(),
            count = candidates.len(),
            "catalogued candidates"
        );

        Ok(candidates)
    }

    /// Like [`scan`](Self::scan), but an empty result is an error.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::EmptyInput`] if no candidate was found, in
    /// addition to the errors of [`scan`](Self::scan).
    pub fn scan_non_empty(&self, dir: &Path) -> Result<Vec<CandidateFile>> {
        let candidates = self.scan(dir)?;
        if candidates.is_empty() {
            return Err(PdfBindError::EmptyInput {
                path: dir.to_path_buf(),
            });
        }
        Ok(candidates)
    }
}

impl Default for FileCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_SUFFIXES)
    }
}
