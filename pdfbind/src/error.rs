//! Error types for pdfbind.
//!
//! Errors fall into two groups:
//!
//! - **Run-level errors** abort the whole merge: a missing input directory,
//!   invalid configuration, or a failure writing the output document.
//! - **Candidate-level errors** concern one input file only. The merger
//!   records them in the report and carries on with the next file.
//!
//! [`PdfBindError::is_recoverable`] tells the two groups apart.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfbind operations.
pub type Result<T> = std::result::Result<T, PdfBindError>;

/// Main error type for pdfbind operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfBindError {
    /// Input directory is missing or is not a directory.
    #[error("Input directory not found or not a directory: {}", path.display())]
    DirectoryNotFound {
        /// Path that was expected to be a directory.
        path: PathBuf,
    },

    /// Input directory contains no eligible files.
    #[error("No PDF or image files found in: {}", path.display())]
    EmptyInput {
        /// Directory that was scanned.
        path: PathBuf,
    },

    /// Source file could not be parsed as a PDF.
    #[error("Failed to open PDF: {}\n  Reason: {reason}", path.display())]
    SourceOpenError {
        /// Path to the source PDF.
        path: PathBuf,
        /// Reason reported by the PDF parser.
        reason: String,
    },

    /// Source PDF is encrypted and cannot be read.
    #[error(
        "PDF is encrypted and cannot be processed: {}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        path.display()
    )]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// A page of a source PDF could not be copied into the output.
    #[error("Failed to copy page {page} of {}\n  Reason: {reason}", path.display())]
    PageCopyError {
        /// Path to the source PDF.
        path: PathBuf,
        /// 1-based page number that failed.
        page: u32,
        /// Details about the failure.
        reason: String,
    },

    /// Image file could not be decoded.
    #[error("Failed to decode image: {}\n  Reason: {reason}", path.display())]
    ImageDecodeError {
        /// Path to the image file.
        path: PathBuf,
        /// Reason reported by the decoder.
        reason: String,
    },

    /// Image or page dimensions cannot be used for placement.
    #[error("Invalid dimensions {width} x {height}: both must be positive and finite")]
    InvalidDimensions {
        /// Offending width.
        width: f32,
        /// Offending height.
        height: f32,
    },

    /// Output file already exists and overwriting is disabled.
    #[error(
        "Output file already exists: {}\n  \
         Remove it or run without --no-clobber to overwrite",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Output document could not be written.
    #[error("Failed to write output file: {}\n  Reason: {source}", path.display())]
    OutputWriteError {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfBindError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl PdfBindError {
    /// Create a DirectoryNotFound error.
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DirectoryNotFound { path: path.into() }
    }

    /// Create a SourceOpenError error.
    pub fn source_open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::SourceOpenError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: impl Into<PathBuf>) -> Self {
        Self::EncryptedPdf { path: path.into() }
    }

    /// Create a PageCopyError error.
    pub fn page_copy(path: impl Into<PathBuf>, page: u32, reason: impl Into<String>) -> Self {
        Self::PageCopyError {
            path: path.into(),
            page,
            reason: reason.into(),
        }
    }

    /// Create an ImageDecodeError error.
    pub fn image_decode(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ImageDecodeError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an OutputWriteError error.
    pub fn output_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::OutputWriteError {
            path: path.into(),
            source,
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        Self::OutputExists { path: path.into() }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error concerns a single candidate file.
    ///
    /// The merger records recoverable errors and moves on to the next file.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SourceOpenError { .. }
                | Self::EncryptedPdf { .. }
                | Self::PageCopyError { .. }
                | Self::ImageDecodeError { .. }
                | Self::InvalidDimensions { .. }
        )
    }

    /// Check if this error should stop the run immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotFound { .. }
                | Self::OutputExists { .. }
                | Self::OutputWriteError { .. }
                | Self::InvalidConfig { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EmptyInput { .. } => 0,
            Self::DirectoryNotFound { .. } => 2,
            Self::SourceOpenError { .. }
            | Self::EncryptedPdf { .. }
            | Self::PageCopyError { .. }
            | Self::ImageDecodeError { .. }
            | Self::InvalidDimensions { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::OutputWriteError { .. } | Self::Io { .. } => 5,
            Self::InvalidConfig { .. } | Self::Other { .. } => 1,
        }
    }
}
