use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{BatchError, Result};

use super::model::{ColumnData, SignalTable};

/// Write a signal table as CSV: header row, then one record per row, no
/// index column.
pub fn write_signal_table(table: &SignalTable, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| BatchError::filesystem(path, e))?;
    write_table_to(table, BufWriter::new(file), path)
}

/// Write a signal table to any writer. `path` is used for diagnostics only.
pub fn write_table_to<W: Write>(table: &SignalTable, sink: W, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);

    writer
        .write_record(table.column_names())
        .map_err(|e| BatchError::from_csv(path, e))?;

    let mut record: Vec<String> = Vec::with_capacity(table.columns().len());
    for row in 0..table.row_count() {
        record.clear();
        record.extend(table.columns().iter().map(|col| match &col.data {
            ColumnData::Raw(cells) => cells[row].clone(),
            ColumnData::Numeric(values) => format_value(values[row]),
        }));
        writer
            .write_record(&record)
            .map_err(|e| BatchError::from_csv(path, e))?;
    }

    writer.flush().map_err(|e| BatchError::filesystem(path, e))
}

/// Shortest round-trip decimal form, always with a fractional part for
/// finite values (`3.0`, not `3`). Missing values become an empty cell.
fn format_value(v: f64) -> String {
    if v.is_nan() {
        return String::new();
    }
    let s = v.to_string();
    if v.is_finite() && !s.contains(['.', 'e', 'E']) {
        format!("{s}.0")
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_signal_table;

    #[test]
    fn numbers_are_written_with_a_decimal_point() {
        assert_eq!(format_value(3.0), "3.0");
        assert_eq!(format_value(-2.0), "-2.0");
        assert_eq!(format_value(2.4), "2.4");
        assert_eq!(format_value(f64::NAN), "");
        assert_eq!(format_value(f64::INFINITY), "inf");
    }

    #[test]
    fn writes_original_columns_then_filtered() {
        let path = Path::new("s.csv");
        let table = read_signal_table("id,signal\nx,1\ny,2\nz,3\n".as_bytes(), path)
            .unwrap()
            .with_filtered_signal(3);

        let mut out = Vec::new();
        write_table_to(&table, &mut out, path).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "id,signal,filtered_signal\nx,1,1.0\ny,2,2.0\nz,3,1.6666666666666667\n"
        );
    }

    #[test]
    fn quoted_cells_survive_a_rewrite() {
        let path = Path::new("s.csv");
        let table = read_signal_table("note,signal\n\"a, b\",1\n".as_bytes(), path)
            .unwrap()
            .with_filtered_signal(1);

        let mut out = Vec::new();
        write_table_to(&table, &mut out, path).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "note,signal,filtered_signal\n\"a, b\",1,1.0\n");
    }
}
