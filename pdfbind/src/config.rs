//! Configuration for a merge run.
//!
//! [`Config`] gathers everything the merger needs: where to read candidates
//! from, where to write the result, which suffixes count as images, and how
//! image pages are laid out. Defaults reproduce the classic behaviour of
//! merging `./files` into `./merged_output.pdf` on A4 pages with 25pt margins.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{PdfBindError, Result};
use crate::layout::{DEFAULT_MARGIN, Margins, PageLayout, PageSize};

/// Default input directory.
pub const DEFAULT_INPUT_DIR: &str = "files";

/// Default output file.
pub const DEFAULT_OUTPUT: &str = "merged_output.pdf";

/// Default image suffixes, matched case-insensitively.
pub const DEFAULT_IMAGE_SUFFIXES: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// Suffix identifying PDF candidates, matched case-insensitively.
pub const PDF_SUFFIX: &str = ".pdf";

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - streams are written as-is.
    None,
    /// Compress streams.
    #[default]
    Standard,
    /// Compress streams and prune unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfBindError;

    /// Parse compression level from `none`, `standard` or `maximum`.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfBindError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// PDF metadata to set on the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Document keywords (comma-separated).
    pub keywords: Option<String>,
}

impl Metadata {
    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
    }

    /// Create metadata from optional strings, trimming whitespace.
    pub fn new(
        title: Option<String>,
        author: Option<String>,
        subject: Option<String>,
        keywords: Option<String>,
    ) -> Self {
        let to_string_opt = |opt: Option<String>| {
            opt.filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
        };

        Self {
            title: to_string_opt(title),
            author: to_string_opt(author),
            subject: to_string_opt(subject),
            keywords: to_string_opt(keywords),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Replace an existing output file.
    #[default]
    Force,
    /// Never overwrite, error if the file exists.
    NoClobber,
}

/// Complete configuration for a merge run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory whose direct children are merged.
    pub input_dir: PathBuf,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Suffixes (with leading dot) treated as images.
    pub image_suffixes: Vec<String>,

    /// Page size for image pages and the output default.
    pub page_size: PageSize,

    /// Margin on each side of image pages, in points.
    pub margin: f32,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Metadata to set on output document.
    pub metadata: Metadata,

    /// Add one bookmark per merged file.
    pub bookmarks: bool,

    /// Dry run mode - plan without creating output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            image_suffixes: DEFAULT_IMAGE_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            page_size: PageSize::default(),
            margin: DEFAULT_MARGIN,
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            metadata: Metadata::default(),
            bookmarks: false,
            dry_run: false,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Create a configuration for the given input directory and output file,
    /// leaving everything else at its default.
    pub fn new(input_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    /// Page layout used for image pages.
    pub fn layout(&self) -> PageLayout {
        PageLayout::new(self.page_size, Margins::uniform(self.margin))
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::InvalidConfig`] if:
    /// - Verbose and quiet modes are both enabled
    /// - The margin is negative or leaves no usable area on the page
    /// - No image suffix is configured, or one lacks its leading dot
    /// - The output would itself be picked up as an input candidate
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            return Err(PdfBindError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(PdfBindError::invalid_config(format!(
                "Margin must be a non-negative number, got {}",
                self.margin
            )));
        }

        let (usable_width, usable_height) = self
            .page_size
            .usable_area(&Margins::uniform(self.margin));
        if usable_width <= 0.0 || usable_height <= 0.0 {
            return Err(PdfBindError::invalid_config(format!(
                "Margin of {}pt leaves no room on a {}x{}pt page",
                self.margin, self.page_size.width, self.page_size.height
            )));
        }

        if self.image_suffixes.is_empty() {
            return Err(PdfBindError::invalid_config(
                "At least one image suffix is required",
            ));
        }

        if let Some(suffix) = self
            .image_suffixes
            .iter()
            .find(|s| !s.starts_with('.') || s.len() < 2)
        {
            return Err(PdfBindError::invalid_config(format!(
                "Image suffix must start with a dot: {suffix}"
            )));
        }

        if self.output_is_candidate() {
            return Err(PdfBindError::invalid_config(format!(
                "Output file cannot be inside the input directory: {}",
                self.output.display()
            )));
        }

        Ok(())
    }

    /// The output would be re-read as a PDF candidate on the next run.
    fn output_is_candidate(&self) -> bool {
        let parent = match self.output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let is_pdf = self
            .output
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase().ends_with(PDF_SUFFIX))
            .unwrap_or(false);

        is_pdf && same_directory(parent, &self.input_dir)
    }
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
