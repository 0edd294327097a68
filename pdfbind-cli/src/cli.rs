//! Command-line interface definition.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use pdfbind::config::{
    CompressionLevel, Config, DEFAULT_IMAGE_SUFFIXES, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT, Metadata,
    OverwriteMode,
};
use pdfbind::layout::{DEFAULT_MARGIN, PageSize};

/// Format of the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable messages.
    #[default]
    Text,
    /// A JSON document on stdout.
    Json,
}

/// Merge a directory of PDF and image files into a single PDF.
///
/// Every file directly inside the input directory whose name ends in .pdf,
/// .jpg, .jpeg or .png (in any letter case) is merged in name order. PDF
/// pages are copied as they are; each image becomes one page, scaled to fit
/// inside the margins. Files that cannot be read are skipped with a warning.
#[derive(Parser, Debug)]
#[command(name = "pdfbind")]
#[command(version)]
#[command(about = "Merge a directory of PDF and image files into a single PDF", long_about = None)]
#[command(author)]
pub struct Cli {
    /// Directory containing the files to merge
    #[arg(value_name = "DIR", default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Output PDF file path
    ///
    /// An existing file is replaced unless --no-clobber is given.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Page size for image pages: a4, letter, legal or WIDTHxHEIGHT in points
    #[arg(short, long, value_name = "SIZE", default_value = "a4")]
    pub page_size: String,

    /// Margin around images, in points
    #[arg(short, long, value_name = "POINTS", default_value_t = DEFAULT_MARGIN)]
    pub margin: f32,

    /// Suffix treated as an image, including the dot (repeatable)
    ///
    /// Replaces the default list (.jpg, .jpeg, .png).
    #[arg(long = "image-suffix", value_name = "SUFFIX")]
    pub image_suffixes: Vec<String>,

    /// Compression level for output PDF
    ///
    /// - none: streams are written as they are
    /// - standard: compress streams (default)
    /// - maximum: also drop unused objects before compressing
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Never overwrite an existing output file
    #[arg(long)]
    pub no_clobber: bool,

    /// Add a bookmark for each merged file
    ///
    /// The bookmark is titled with the file name and points at the first
    /// page the file contributed.
    #[arg(short, long)]
    pub bookmarks: bool,

    /// Set title metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Set author metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Set subject metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub subject: Option<String>,

    /// Set keywords metadata for output PDF (comma-separated)
    #[arg(long, value_name = "TEXT")]
    pub keywords: Option<String>,

    /// List what would be merged without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Show per-file details and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Format of the final report
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = ReportFormat::Text)]
    pub report: ReportFormat,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    pub fn to_config(&self) -> anyhow::Result<Config> {
        let page_size = PageSize::parse(&self.page_size)?;

        let compression: CompressionLevel = self
            .compression
            .parse()
            .context("Invalid --compression")?;

        let overwrite_mode = if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Force
        };

        let image_suffixes = if self.image_suffixes.is_empty() {
            DEFAULT_IMAGE_SUFFIXES.iter().map(|s| s.to_string()).collect()
        } else {
            self.image_suffixes.clone()
        };

        let config = Config {
            input_dir: self.input_dir.clone(),
            output: self.output.clone(),
            image_suffixes,
            page_size,
            margin: self.margin,
            overwrite_mode,
            compression,
            metadata: Metadata::new(
                self.title.clone(),
                self.author.clone(),
                self.subject.clone(),
                self.keywords.clone(),
            ),
            bookmarks: self.bookmarks,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
        };

        config.validate().context("Invalid configuration")?;

        Ok(config)
    }
}
