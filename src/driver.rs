use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::{BatchConfig, FailurePolicy};
use crate::data::process_signal;
use crate::error::{BatchError, Result};
use crate::grayscale::process_image;
use crate::report::{BatchObserver, BatchSummary, FileFailure, FileKind, FileReport};

// ---------------------------------------------------------------------------
// Planning: enumerate and partition the input directory
// ---------------------------------------------------------------------------

/// Input files split by the component that will handle them, each list
/// sorted by file name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchPlan {
    pub images: Vec<PathBuf>,
    pub signals: Vec<PathBuf>,
    pub ignored: Vec<PathBuf>,
}

impl BatchPlan {
    pub fn len(&self) -> usize {
        self.images.len() + self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// List `config.input_dir` (non-recursively) and partition its regular files
/// by extension. Extension matching is case-insensitive; anything without a
/// configured extension is ignored.
pub fn plan_batch(config: &BatchConfig) -> Result<BatchPlan> {
    let dir = &config.input_dir;
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| BatchError::filesystem(dir, e))? {
        let entry = entry.map_err(|e| BatchError::filesystem(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        } else {
            debug!("skipping non-file entry {}", path.display());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut plan = BatchPlan::default();
    for path in files {
        let ext = name_suffix(&path);

        if config.image_extensions.contains(&ext) {
            plan.images.push(path);
        } else if config.signal_extensions.contains(&ext) {
            plan.signals.push(path);
        } else {
            plan.ignored.push(path);
        }
    }
    Ok(plan)
}

/// Lower-cased text after the last `.` of the file name. Unlike
/// [`Path::extension`], a dot-file such as `.png` yields `png`.
fn name_suffix(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Create `dir` and its parents if missing. Existing directories are fine.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| BatchError::filesystem(dir, e))
}

/// Run one batch: ensure the output directory, then convert every image and
/// smooth every signal found in the input directory.
///
/// Files are processed one at a time in two passes, images first. Under
/// [`FailurePolicy::Abort`] the first failing file ends the run with its
/// error; outputs already written stay in place. Under
/// [`FailurePolicy::Continue`] failures are collected in the returned
/// summary.
pub fn run_batch(config: &BatchConfig, observer: &mut dyn BatchObserver) -> Result<BatchSummary> {
    config.validate()?;
    debug!("batch config: {config:?}");

    ensure_output_dir(&config.output_dir)?;
    let plan = plan_batch(config)?;
    info!(
        "{}: {} image(s), {} signal file(s), {} ignored",
        config.input_dir.display(),
        plan.images.len(),
        plan.signals.len(),
        plan.ignored.len()
    );

    let mut summary = BatchSummary {
        ignored: plan.ignored.len(),
        ..BatchSummary::default()
    };
    for path in &plan.ignored {
        observer.file_ignored(path);
    }

    for path in &plan.images {
        let outcome = process_image(path, &config.output_dir);
        handle_outcome(config, observer, &mut summary, FileKind::Image, path, outcome)?;
    }

    for path in &plan.signals {
        let outcome = process_signal(path, &config.output_dir, config.window_size);
        handle_outcome(config, observer, &mut summary, FileKind::Signal, path, outcome)?;
    }

    observer.batch_finished(&summary);
    Ok(summary)
}

fn handle_outcome(
    config: &BatchConfig,
    observer: &mut dyn BatchObserver,
    summary: &mut BatchSummary,
    kind: FileKind,
    path: &Path,
    outcome: Result<FileReport>,
) -> Result<()> {
    match outcome {
        Ok(report) => {
            summary.record(&report);
            observer.file_processed(&report);
            Ok(())
        }
        Err(err) => {
            observer.file_failed(kind, path, &err);
            match config.failure_policy {
                FailurePolicy::Abort => Err(err),
                FailurePolicy::Continue => {
                    summary.failures.push(FileFailure {
                        kind,
                        input: path.to_path_buf(),
                        error_kind: err.kind(),
                        message: err.to_string(),
                    });
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn plan_partitions_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", "z.csv", "c.csv", "notes.txt", "README", "x.jpeg"] {
            touch(dir.path(), name);
        }
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let config = BatchConfig::new(dir.path(), dir.path().join("out"));
        let plan = plan_batch(&config).unwrap();

        assert_eq!(names(&plan.images), ["a.JPG", "b.png"]);
        assert_eq!(names(&plan.signals), ["c.csv", "z.csv"]);
        assert_eq!(names(&plan.ignored), ["README", "notes.txt", "x.jpeg"]);
        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn dot_files_are_dispatched_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), ".png");
        touch(dir.path(), ".csv");
        touch(dir.path(), "archive.tar.gz");

        let config = BatchConfig::new(dir.path(), dir.path().join("out"));
        let plan = plan_batch(&config).unwrap();

        assert_eq!(names(&plan.images), [".png"]);
        assert_eq!(names(&plan.signals), [".csv"]);
        assert_eq!(names(&plan.ignored), ["archive.tar.gz"]);
    }

    #[test]
    fn configured_extensions_are_honoured() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "x.jpeg");
        touch(dir.path(), "s.tsv");

        let mut config = BatchConfig::new(dir.path(), dir.path().join("out"));
        config.image_extensions.insert("jpeg".into());
        config.signal_extensions = ["tsv".to_string()].into_iter().collect();

        let plan = plan_batch(&config).unwrap();
        assert_eq!(names(&plan.images), ["x.jpeg"]);
        assert_eq!(names(&plan.signals), ["s.tsv"]);
    }

    #[test]
    fn missing_input_dir_is_a_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = BatchConfig::new(dir.path().join("nope"), dir.path().join("out"));
        let err = plan_batch(&config).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Filesystem);
    }

    #[test]
    fn ensure_output_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("b");
        ensure_output_dir(&out).unwrap();
        ensure_output_dir(&out).unwrap();
        assert!(out.is_dir());
    }
}
