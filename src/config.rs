use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BatchError, Result};

// ---------------------------------------------------------------------------
// Failure policy
// ---------------------------------------------------------------------------

/// What the driver does when a single file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing file and return its error.
    #[default]
    Abort,
    /// Record the failure, keep going, report all failures at the end.
    Continue,
}

// ---------------------------------------------------------------------------
// Batch configuration
// ---------------------------------------------------------------------------

/// Everything the batch driver needs to know about one run.
///
/// Extensions are stored lower-case and without the leading dot; matching
/// against file names is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Directory scanned (non-recursively) for inputs.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory receiving one output per processed input.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Moving-average window length in samples.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Extensions dispatched to the image converter.
    #[serde(default = "default_image_extensions")]
    pub image_extensions: BTreeSet<String>,

    /// Extensions dispatched to the signal filter.
    #[serde(default = "default_signal_extensions")]
    pub signal_extensions: BTreeSet<String>,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

pub const DEFAULT_WINDOW_SIZE: usize = 5;

fn default_input_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_image_extensions() -> BTreeSet<String> {
    ["jpg", "png"].iter().map(|s| s.to_string()).collect()
}

fn default_signal_extensions() -> BTreeSet<String> {
    ["csv"].iter().map(|s| s.to_string()).collect()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            window_size: default_window_size(),
            image_extensions: default_image_extensions(),
            signal_extensions: default_signal_extensions(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl BatchConfig {
    /// Default configuration reading from `input_dir` and writing to `output_dir`.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| BatchError::filesystem(path, e))?;
        let mut config: BatchConfig = serde_json::from_str(&text)
            .map_err(|e| BatchError::Config(format!("{}: {e}", path.display())))?;
        config.normalize_extensions();
        config.validate()?;
        Ok(config)
    }

    /// Lower-case every extension and strip a leading dot, so `".PNG"` and
    /// `"png"` mean the same thing.
    pub fn normalize_extensions(&mut self) {
        fn normalize(set: &BTreeSet<String>) -> BTreeSet<String> {
            set.iter()
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .collect()
        }
        self.image_extensions = normalize(&self.image_extensions);
        self.signal_extensions = normalize(&self.signal_extensions);
    }

    /// Reject configurations the driver cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(BatchError::Config("window_size must be at least 1".into()));
        }
        if self.image_extensions.is_empty() && self.signal_extensions.is_empty() {
            return Err(BatchError::Config(
                "at least one image or signal extension is required".into(),
            ));
        }
        if self.image_extensions.iter().any(|e| e.is_empty())
            || self.signal_extensions.iter().any(|e| e.is_empty())
        {
            return Err(BatchError::Config("empty file extension".into()));
        }
        if let Some(ext) = self
            .image_extensions
            .intersection(&self.signal_extensions)
            .next()
        {
            return Err(BatchError::Config(format!(
                "extension '{ext}' is listed as both image and signal"
            )));
        }
        Ok(())
    }
}
