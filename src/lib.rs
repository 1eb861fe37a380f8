//! Batch grayscale conversion for images and moving-average smoothing for
//! CSV signal tables.
//!
//! One run reads a single input directory:
//! - `.jpg` / `.png` files are reduced to one luma channel
//! - `.csv` files get a trailing `filtered_signal` column holding the
//!   centered moving average of their `signal` column
//!
//! and writes each result to the output directory under the same file name.
//!
//! # Example
//!
//! ```no_run
//! use greyfilter::{run_batch, BatchConfig, LogObserver};
//!
//! let config = BatchConfig::new("data", "output");
//! let summary = run_batch(&config, &mut LogObserver).unwrap();
//! println!("{} files processed", summary.processed());
//! ```

pub mod config;
pub mod data;
pub mod driver;
pub mod error;
pub mod grayscale;
pub mod report;

use std::path::{Path, PathBuf};

pub use config::{BatchConfig, FailurePolicy};
pub use driver::{plan_batch, run_batch, BatchPlan};
pub use error::{BatchError, ErrorKind};
pub use report::{BatchObserver, BatchSummary, FileReport, LogObserver, NullObserver};

/// `output_dir/<file name of input>`.
pub(crate) fn output_path_for(input: &Path, output_dir: &Path) -> error::Result<PathBuf> {
    let name = input.file_name().ok_or_else(|| {
        BatchError::filesystem(
            input,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    Ok(output_dir.join(name))
}
