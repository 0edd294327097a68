//! The merge pipeline.
//!
//! [`Merger`] catalogs the input directory, feeds each candidate to the
//! handler for its kind, and writes the result once every candidate was
//! attempted. A candidate that fails is reported and skipped; the others
//! are merged as if it were not there.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{CandidateFile, FileCatalog, FileKind};
use crate::config::{Config, OverwriteMode};
use crate::error::{PdfBindError, Result};
use crate::io::{PdfReader, PdfWriter, WriteOptions, format_file_size};
use crate::layout::Placement;
use crate::merge::bookmarks::{Bookmark, BookmarkManager};
use crate::merge::document::OutputDocument;
use crate::merge::images::ImageComposer;
use crate::merge::metadata::MetadataManager;
use crate::merge::pages::PageTransplanter;

/// What happened to one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CandidateStatus {
    /// The candidate's pages are in the output.
    Merged {
        /// Pages contributed.
        pages: usize,
    },
    /// The candidate was skipped.
    Failed {
        /// Why it failed.
        error: String,
    },
}

/// Result of processing one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateOutcome {
    /// The candidate.
    #[serde(flatten)]
    pub candidate: CandidateFile,
    /// Outcome for this candidate.
    #[serde(flatten)]
    pub status: CandidateStatus,
}

impl CandidateOutcome {
    /// Check if the candidate made it into the output.
    pub fn is_merged(&self) -> bool {
        matches!(self.status, CandidateStatus::Merged { .. })
    }

    /// Pages contributed to the output.
    pub fn pages(&self) -> usize {
        match self.status {
            CandidateStatus::Merged { pages } => pages,
            CandidateStatus::Failed { .. } => 0,
        }
    }
}

/// Statistics about a merge operation.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStatistics {
    /// Number of candidates found.
    pub candidates: usize,

    /// Number of candidates merged.
    pub succeeded: usize,

    /// Number of candidates skipped because of an error.
    pub failed: usize,

    /// Total number of pages in the output.
    pub total_pages: usize,

    /// Total size of the candidate files.
    pub input_size: u64,

    /// Size of the written output.
    pub output_size: u64,

    /// Number of bookmarks added.
    pub bookmarks_added: usize,

    /// Whether streams were compressed.
    pub compressed: bool,

    /// Time spent building the document.
    #[serde(serialize_with = "serialize_millis")]
    pub merge_time: Duration,

    /// Time spent writing the output.
    #[serde(serialize_with = "serialize_millis")]
    pub write_time: Duration,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// Report of a completed merge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Path of the written document.
    pub output: PathBuf,
    /// One entry per candidate, in merge order.
    pub outcomes: Vec<CandidateOutcome>,
    /// Totals.
    pub statistics: MergeStatistics,
}

impl MergeReport {
    /// Candidates that were skipped.
    pub fn failures(&self) -> impl Iterator<Item = &CandidateOutcome> {
        self.outcomes.iter().filter(|o| !o.is_merged())
    }
}

/// What a dry run found for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PlannedAction {
    /// All pages of a PDF would be copied.
    CopyPages {
        /// Pages in the source.
        pages: usize,
    },
    /// An image would be placed on a new page.
    PlaceImage {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Where it would be drawn.
        placement: Placement,
    },
    /// The candidate would be skipped.
    Skip {
        /// Why it would fail.
        reason: String,
    },
}

impl PlannedAction {
    /// Pages this action would add.
    pub fn pages(&self) -> usize {
        match self {
            Self::CopyPages { pages } => *pages,
            Self::PlaceImage { .. } => 1,
            Self::Skip { .. } => 0,
        }
    }
}

/// One candidate of a dry run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedCandidate {
    /// The candidate.
    #[serde(flatten)]
    pub candidate: CandidateFile,
    /// What a real run would do with it.
    #[serde(flatten)]
    pub action: PlannedAction,
}

/// Result of a dry run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePlan {
    /// Path a real run would write.
    pub output: PathBuf,
    /// Whether the output file exists already.
    pub output_exists: bool,
    /// One entry per candidate, in merge order.
    pub candidates: Vec<PlannedCandidate>,
    /// Pages a real run would produce.
    pub total_pages: usize,
}

/// How a run ended.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum MergeOutcome {
    /// The output was written.
    Merged(MergeReport),
    /// The input directory had no candidates. Nothing was written.
    EmptyInput {
        /// Directory that was scanned.
        path: PathBuf,
    },
    /// Dry run. Nothing was written.
    DryRun(MergePlan),
}

/// Progress notifications emitted while merging.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    /// Candidates were found and processing starts.
    Started {
        /// Number of candidates.
        total: usize,
    },
    /// A candidate was processed.
    Processed {
        /// Zero-based position in merge order.
        index: usize,
        /// Number of candidates.
        total: usize,
        /// What happened.
        outcome: &'a CandidateOutcome,
    },
    /// All candidates were attempted and the output is being written.
    Writing {
        /// Output path.
        path: &'a Path,
    },
}

/// Merges a directory of PDFs and images into one PDF.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    /// Reader for counting pages during dry runs.
    reader: PdfReader,

    /// Copies PDF pages.
    transplanter: PageTransplanter,

    /// Places images.
    composer: ImageComposer,

    /// Bookmark manager for outline handling.
    bookmark_manager: BookmarkManager,

    /// Metadata manager for document properties.
    metadata_manager: MetadataManager,
}

impl Merger {
    /// Create a new merger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a merge as described by `config`.
    ///
    /// Returns [`MergeOutcome::DryRun`] when `config.dry_run` is set,
    /// [`MergeOutcome::EmptyInput`] when there is nothing to merge, and
    /// [`MergeOutcome::Merged`] otherwise, even if some candidates failed.
    ///
    /// # Errors
    ///
    /// Only problems that affect the whole run are errors: an invalid
    /// configuration, a missing input directory, an existing output with
    /// [`OverwriteMode::NoClobber`], or a failure writing the output.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfbind::merge::{Merger, MergeOutcome};
    /// # use pdfbind::Config;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config::new("files", "merged_output.pdf");
    /// if let MergeOutcome::Merged(report) = Merger::new().run(&config)? {
    ///     println!("{} pages", report.statistics.total_pages);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn run(&self, config: &Config) -> Result<MergeOutcome> {
        self.run_with_progress(config, |_| {})
    }

    /// Like [`run`](Self::run), calling `on_progress` as work advances.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_with_progress<F>(&self, config: &Config, mut on_progress: F) -> Result<MergeOutcome>
    where
        F: FnMut(ProgressEvent<'_>),
    {
        if config.dry_run {
            return self.plan(config);
        }

        config.validate()?;

        let candidates = FileCatalog::new(&config.image_suffixes).scan(&config.input_dir)?;
        if candidates.is_empty() {
            info!(dir = %config.input_dir.display(), "no files to merge");
            return Ok(MergeOutcome::EmptyInput {
                path: config.input_dir.clone(),
            });
        }

        let writer = PdfWriter::with_options(WriteOptions::from_compression(config.compression));
        if config.overwrite_mode == OverwriteMode::NoClobber && writer.exists(&config.output) {
            return Err(PdfBindError::output_exists(&config.output));
        }
        writer.can_write(&config.output)?;

        let merge_start = Instant::now();
        let total = candidates.len();
        on_progress(ProgressEvent::Started { total });

        let mut output = OutputDocument::new(config.layout());
        let mut outcomes = Vec::with_capacity(total);
        let mut bookmarks = Vec::new();
        let mut input_size = 0;

        for (index, candidate) in candidates.into_iter().enumerate() {
            input_size += std::fs::metadata(&candidate.path)
                .map(|m| m.len())
                .unwrap_or(0);

            let first_page = output.page_count();
            let status = match self.merge_candidate(&candidate, &mut output) {
                Ok(pages) => {
                    debug!(file = %candidate.file_name, pages, "merged");
                    if let Some(&page_id) = output.page_ids().get(first_page) {
                        bookmarks.push(Bookmark::new(&candidate.file_name, page_id));
                    }
                    CandidateStatus::Merged { pages }
                }
                Err(err) => {
                    warn!(file = %candidate.file_name, error = %err, "skipping file");
                    CandidateStatus::Failed {
                        error: err.to_string(),
                    }
                }
            };

            outcomes.push(CandidateOutcome { candidate, status });
            if let Some(outcome) = outcomes.last() {
                on_progress(ProgressEvent::Processed {
                    index,
                    total,
                    outcome,
                });
            }
        }

        let total_pages = output.page_count();
        let mut document = output.finish();

        let bookmarks_added = if config.bookmarks {
            self.bookmark_manager
                .add_bookmarks(&mut document, &bookmarks)?
        } else {
            0
        };
        self.metadata_manager
            .set_metadata(&mut document, &config.metadata);

        let merge_time = merge_start.elapsed();

        on_progress(ProgressEvent::Writing {
            path: &config.output,
        });
        let write_stats = writer.save_with_stats(document, &config.output)?;

        let succeeded = outcomes.iter().filter(|o| o.is_merged()).count();
        let statistics = MergeStatistics {
            candidates: total,
            succeeded,
            failed: total - succeeded,
            total_pages,
            input_size,
            output_size: write_stats.file_size,
            bookmarks_added,
            compressed: write_stats.compressed,
            merge_time,
            write_time: write_stats.write_time,
        };

        info!(
            output = %config.output.display(),
            pages = total_pages,
            succeeded,
            failed = statistics.failed,
            "merge complete"
        );

        Ok(MergeOutcome::Merged(MergeReport {
            output: config.output.clone(),
            outcomes,
            statistics,
        }))
    }

    /// Work out what a run would do, without writing anything.
    ///
    /// PDFs are opened to count their pages and images are probed for their
    /// size. Candidates that would fail are listed with the reason.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration or a missing input
    /// directory.
    pub fn plan(&self, config: &Config) -> Result<MergeOutcome> {
        config.validate()?;

        let candidates = FileCatalog::new(&config.image_suffixes).scan(&config.input_dir)?;
        if candidates.is_empty() {
            return Ok(MergeOutcome::EmptyInput {
                path: config.input_dir.clone(),
            });
        }

        let layout = config.layout();
        let candidates: Vec<PlannedCandidate> = candidates
            .into_iter()
            .map(|candidate| {
                let result = match candidate.kind {
                    FileKind::Pdf => self
                        .reader
                        .page_count(&candidate.path)
                        .map(|pages| PlannedAction::CopyPages { pages }),
                    FileKind::Image => self.composer.plan(&candidate.path, &layout).map(
                        |((width, height), placement)| PlannedAction::PlaceImage {
                            width,
                            height,
                            placement,
                        },
                    ),
                };
                let action = result.unwrap_or_else(|err| PlannedAction::Skip {
                    reason: err.to_string(),
                });
                PlannedCandidate { candidate, action }
            })
            .collect();

        let total_pages = candidates.iter().map(|c| c.action.pages()).sum();

        Ok(MergeOutcome::DryRun(MergePlan {
            output: config.output.clone(),
            output_exists: config.output.exists(),
            candidates,
            total_pages,
        }))
    }

    fn merge_candidate(
        &self,
        candidate: &CandidateFile,
        output: &mut OutputDocument,
    ) -> Result<usize> {
        match candidate.kind {
            FileKind::Pdf => self.transplanter.transplant(&candidate.path, output),
            FileKind::Image => self.composer.compose(&candidate.path, output).map(|_| 1),
        }
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}
