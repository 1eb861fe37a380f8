use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::error::{BatchError, ErrorKind};

// ---------------------------------------------------------------------------
// Per-file outcome records
// ---------------------------------------------------------------------------

/// Which component handled a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Signal,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Image => write!(f, "image"),
            FileKind::Signal => write!(f, "signal"),
        }
    }
}

/// A successfully processed file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub kind: FileKind,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Human-readable size: `WxH` for images, `N rows` for signals.
    pub detail: String,
}

/// A file that failed while the driver kept going.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFailure {
    pub kind: FileKind,
    pub input: PathBuf,
    pub error_kind: ErrorKind,
    pub message: String,
}

/// Totals for one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub images_processed: usize,
    pub signals_processed: usize,
    /// Directory entries that matched no configured extension.
    pub ignored: usize,
    pub failures: Vec<FileFailure>,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.images_processed + self.signals_processed
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record(&mut self, report: &FileReport) {
        match report.kind {
            FileKind::Image => self.images_processed += 1,
            FileKind::Signal => self.signals_processed += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Observer interface
// ---------------------------------------------------------------------------

/// Receives progress events from the batch driver.
///
/// All methods default to no-ops so observers implement only what they need.
pub trait BatchObserver {
    fn file_ignored(&mut self, _path: &Path) {}

    fn file_processed(&mut self, _report: &FileReport) {}

    fn file_failed(&mut self, _kind: FileKind, _path: &Path, _error: &BatchError) {}

    fn batch_finished(&mut self, _summary: &BatchSummary) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default)]
pub struct NullObserver;

impl BatchObserver for NullObserver {}

/// Default observer: one log line per event.
#[derive(Debug, Default)]
pub struct LogObserver;

impl BatchObserver for LogObserver {
    fn file_ignored(&mut self, path: &Path) {
        debug!("ignoring {}", path.display());
    }

    fn file_processed(&mut self, report: &FileReport) {
        info!(
            "{} {} → {} ({})",
            report.kind,
            report.input.display(),
            report.output.display(),
            report.detail
        );
    }

    fn file_failed(&mut self, kind: FileKind, path: &Path, error: &BatchError) {
        error!("{kind} {} failed [{}]: {error}", path.display(), error.kind());
    }

    fn batch_finished(&mut self, summary: &BatchSummary) {
        info!(
            "batch finished: {} images, {} signals, {} ignored",
            summary.images_processed, summary.signals_processed, summary.ignored
        );
        if !summary.failures.is_empty() {
            warn!("{} file(s) failed:", summary.failures.len());
            for failure in &summary.failures {
                warn!(
                    "  {} [{}]: {}",
                    failure.input.display(),
                    failure.error_kind,
                    failure.message
                );
            }
        }
    }
}
