/// Signal layer: table model, CSV loading, smoothing and writing.
///
/// Architecture:
/// ```text
///   signal .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SignalTable (raw cells + parsed `signal`)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  centered moving average, same-length output
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  SignalTable + `filtered_signal` → .csv
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;

use std::path::Path;

use crate::error::{BatchError, Result};
use crate::report::{FileKind, FileReport};

/// Load, smooth and write one signal file to `output_dir/<basename>`.
pub fn process_signal(path: &Path, output_dir: &Path, window_size: usize) -> Result<FileReport> {
    if window_size == 0 {
        return Err(BatchError::Config("window_size must be at least 1".into()));
    }
    let table = loader::load_signal_table(path)?;
    let table = table.with_filtered_signal(window_size);

    let output_path = crate::output_path_for(path, output_dir)?;
    writer::write_signal_table(&table, &output_path)?;

    Ok(FileReport {
        kind: FileKind::Signal,
        input: path.to_path_buf(),
        output: output_path,
        detail: format!("{} rows", table.row_count()),
    })
}
