use std::path::Path;

use crate::error::{BatchError, Result};

use super::model::{Column, ColumnData, SignalTable, SIGNAL_COLUMN};

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Load a signal table from a CSV file.
///
/// CSV layout: header row with column names, one record per sample. The
/// `signal` column must hold floats; an empty cell or a missing-value token
/// such as `NA`, `N/A`, `NaN` or `null` reads as NaN. Every other column is
/// carried through untouched.
///
/// # Errors
///
/// * [`BatchError::Filesystem`] – the file cannot be opened or read
/// * [`BatchError::Parse`] – not valid CSV, or rows of unequal width
/// * [`BatchError::EmptyTable`] – a zero-byte file with no header row
/// * [`BatchError::Schema`] – no `signal` column in the header
/// * [`BatchError::InvalidSignalValue`] – a `signal` cell is not a number
pub fn load_signal_table(path: &Path) -> Result<SignalTable> {
    let file = std::fs::File::open(path).map_err(|e| BatchError::filesystem(path, e))?;
    read_signal_table(file, path)
}

/// Parse a signal table from any reader. `path` is used for diagnostics only.
pub fn read_signal_table<R: std::io::Read>(source: R, path: &Path) -> Result<SignalTable> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| BatchError::from_csv(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        return Err(BatchError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    let signal_idx = headers
        .iter()
        .position(|h| h == SIGNAL_COLUMN)
        .ok_or_else(|| BatchError::Schema {
            path: path.to_path_buf(),
            column: SIGNAL_COLUMN.to_string(),
        })?;

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    let mut signal = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| BatchError::from_csv(path, e))?;

        let raw = record.get(signal_idx).unwrap_or("");
        signal.push(parse_sample(raw).ok_or_else(|| BatchError::InvalidSignalValue {
            path: path.to_path_buf(),
            row: row_no,
            value: raw.to_string(),
        })?);

        for (col_idx, value) in record.iter().enumerate() {
            cells[col_idx].push(value.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| Column {
            name,
            data: ColumnData::Raw(cells),
        })
        .collect();

    Ok(SignalTable::new(columns, signal))
}

/// Cell texts read as a missing sample, the usual spreadsheet and dataframe
/// spellings of "no value".
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn parse_sample(s: &str) -> Option<f64> {
    let s = s.trim();
    if MISSING_TOKENS.contains(&s) {
        return Some(f64::NAN);
    }
    s.parse::<f64>().ok()
}
