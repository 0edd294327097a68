//! pdfbind - Merge a directory of PDFs and images into a single PDF.
//!
//! Files are taken from one directory, ordered by name, and appended to a
//! new document:
//!
//! - every page of each PDF is copied as is
//! - each image becomes one page, scaled to fit inside the page margins
//!
//! A file that cannot be read is reported and skipped. Only a missing input
//! directory or a failure writing the output stops the run.
//!
//! # Examples
//!
//! ## Merge a directory
//!
//! ```no_run
//! use pdfbind::{Config, MergeOutcome, Merger};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new("files", "merged_output.pdf");
//!
//! match Merger::new().run(&config)? {
//!     MergeOutcome::Merged(report) => {
//!         println!("Created {} page document", report.statistics.total_pages);
//!         for failed in report.failures() {
//!             eprintln!("skipped {}", failed.candidate.file_name);
//!         }
//!     }
//!     MergeOutcome::EmptyInput { path } => println!("nothing to merge in {}", path.display()),
//!     MergeOutcome::DryRun(_) => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Using individual components
//!
//! ```no_run
//! use pdfbind::FileCatalog;
//! use pdfbind::layout::PageLayout;
//! use pdfbind::merge::{ImageComposer, OutputDocument, PageTransplanter};
//! use pdfbind::io::PdfWriter;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let candidates = FileCatalog::default().scan(Path::new("files"))?;
//!
//! let mut output = OutputDocument::new(PageLayout::default());
//! PageTransplanter::new().transplant(&candidates[0].path, &mut output)?;
//! ImageComposer::new().compose(Path::new("files/scan.png"), &mut output)?;
//!
//! PdfWriter::new().save(output.finish(), Path::new("out.pdf"))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod io;
pub mod layout;
pub mod merge;
pub mod output;

pub use catalog::{CandidateFile, FileCatalog, FileKind};
pub use config::Config;
pub use error::{PdfBindError, Result};
pub use layout::{PageSize, Placement, compute_placement};
pub use merge::{MergeOutcome, Merger};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
