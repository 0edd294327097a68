//! Progress bar for the merge loop.
//!
//! Rendered on stderr, and only when stderr is a terminal.
//!
//! # Examples
//!
//! ```
//! use pdfbind::output::progress::ProgressBar;
//!
//! let mut progress = ProgressBar::new(3);
//! progress.set_message("a.pdf");
//! progress.increment();
//! progress.finish();
//! ```

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use crate::merge::ProgressEvent;

/// Progress bar for visual feedback while files are merged: `[=====>    ]`
#[derive(Debug)]
pub struct ProgressBar {
    total: usize,
    current: usize,
    message: Option<String>,
    start_time: Instant,
    last_update: Instant,
    /// Minimum time between redraws.
    update_interval: Duration,
    enabled: bool,
}

impl ProgressBar {
    /// Create a new progress bar for `total` items.
    pub fn new(total: usize) -> Self {
        let now = Instant::now();
        Self {
            total,
            current: 0,
            message: None,
            start_time: now,
            last_update: now,
            update_interval: Duration::from_millis(100),
            enabled: io::stderr().is_terminal(),
        }
    }

    /// Create a disabled progress bar (no output).
    pub fn disabled() -> Self {
        let mut pb = Self::new(0);
        pb.enabled = false;
        pb
    }

    /// Check if the bar draws anything.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the message shown next to the bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Update the progress bar to a specific value.
    pub fn update(&mut self, current: usize) {
        self.current = current;

        if self.last_update.elapsed() < self.update_interval && current < self.total {
            return;
        }

        self.last_update = Instant::now();
        self.render();
    }

    /// Increment the progress bar by one.
    pub fn increment(&mut self) {
        self.update(self.current + 1);
    }

    /// Draw the final state and end the line.
    pub fn finish(&mut self) {
        if self.enabled {
            self.current = self.total;
            self.render();
            eprintln!();
        }
    }

    /// Feed a merge progress event into the bar.
    pub fn handle(&mut self, event: &ProgressEvent<'_>) {
        match event {
            ProgressEvent::Started { total } => {
                self.total = *total;
                self.current = 0;
                self.start_time = Instant::now();
            }
            ProgressEvent::Processed { index, outcome, .. } => {
                self.set_message(outcome.candidate.file_name.clone());
                self.update(index + 1);
            }
            ProgressEvent::Writing { .. } => {
                self.set_message("writing");
                self.finish();
            }
        }
    }

    fn render(&self) {
        if !self.enabled {
            return;
        }

        eprint!("\r\x1b[K{}", self.render_bar());
        io::stderr().flush().ok();
    }

    fn render_bar(&self) -> String {
        let width = 30;
        let filled = ((width * self.current) / self.total.max(1)).min(width);
        let arrow = if filled > 0 { ">" } else { "" };
        let bar = format!(
            "[{}{}{}]",
            "=".repeat(filled.saturating_sub(1)),
            arrow,
            " ".repeat(width - filled)
        );

        let mut line = format!(
            "{bar} {:>3}% {}/{} {}",
            self.percent() as usize,
            self.current,
            self.total,
            format_duration(self.start_time.elapsed())
        );
        if let Some(ref msg) = self.message {
            line.push(' ');
            line.push_str(msg);
        }
        line
    }

    /// Get the current progress percentage.
    pub fn percent(&self) -> f64 {
        if self.total > 0 {
            (self.current as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
