use super::filter::moving_average;

/// Name of the column holding the raw samples.
pub const SIGNAL_COLUMN: &str = "signal";

/// Name of the column receiving the smoothed samples.
pub const FILTERED_COLUMN: &str = "filtered_signal";

// ---------------------------------------------------------------------------
// Column – one named column of the table
// ---------------------------------------------------------------------------

/// Cell storage for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Cells exactly as read from the file.
    Raw(Vec<String>),
    /// Computed values, formatted only when written.
    Numeric(Vec<f64>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Raw(cells) => cells.len(),
            ColumnData::Numeric(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

// ---------------------------------------------------------------------------
// SignalTable – the complete loaded table
// ---------------------------------------------------------------------------

/// A CSV table with a numeric `signal` column.
///
/// Columns keep their file order. Every column has `row_count` cells, so row
/// `i` of any derived column lines up with row `i` of `signal`.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTable {
    columns: Vec<Column>,
    signal: Vec<f64>,
    row_count: usize,
}

impl SignalTable {
    /// Build a table from raw columns and the parsed `signal` values.
    ///
    /// Callers guarantee that every column and `signal` share one length.
    pub fn new(columns: Vec<Column>, signal: Vec<f64>) -> Self {
        let row_count = signal.len();
        debug_assert!(columns.iter().all(|c| c.data.len() == row_count));
        SignalTable {
            columns,
            signal,
            row_count,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Parsed `signal` samples (NaN for empty cells).
    pub fn signal(&self) -> &[f64] {
        &self.signal
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Smoothed values, if [`with_filtered_signal`](Self::with_filtered_signal)
    /// has run.
    pub fn filtered_signal(&self) -> Option<&[f64]> {
        match self.column(FILTERED_COLUMN).map(|c| &c.data) {
            Some(ColumnData::Numeric(values)) => Some(values),
            _ => None,
        }
    }

    /// Set a column by name: an existing column is overwritten in place,
    /// otherwise the column is appended.
    pub fn set_column(&mut self, name: &str, data: ColumnData) {
        debug_assert_eq!(data.len(), self.row_count);
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(col) => col.data = data,
            None => self.columns.push(Column {
                name: name.to_string(),
                data,
            }),
        }
    }

    /// Compute the moving average of `signal` and store it as
    /// `filtered_signal`.
    pub fn with_filtered_signal(mut self, window_size: usize) -> Self {
        let filtered = moving_average(&self.signal, window_size);
        self.set_column(FILTERED_COLUMN, ColumnData::Numeric(filtered));
        self
    }
}
