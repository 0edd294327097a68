//! Building the merged document.
//!
//! - [`document`] holds the output document being assembled.
//! - [`pages`] copies pages out of source PDFs.
//! - [`images`] turns images into pages.
//! - [`bookmarks`] and [`metadata`] finish the document.
//! - [`merger`] drives all of the above for a directory.

pub mod bookmarks;
pub mod document;
pub mod images;
pub mod merger;
pub mod metadata;
pub mod pages;

pub use bookmarks::{Bookmark, BookmarkManager};
pub use document::OutputDocument;
pub use images::ImageComposer;
pub use merger::{
    CandidateOutcome, CandidateStatus, MergeOutcome, MergePlan, MergeReport, MergeStatistics,
    Merger, PlannedAction, PlannedCandidate, ProgressEvent,
};
pub use metadata::MetadataManager;
pub use pages::PageTransplanter;
