//! Source Table Module
//!
//! Reads tabular input into typed rows. Two backends exist: delimited text
//! (UTF-8 or EUC-KR) and XLSX workbooks via calamine; the file extension
//! picks the backend. Row 1 is always the header and never data.

mod delimited;
mod workbook;

use std::path::{Path, PathBuf};

use crate::error::HwpxGenError;
use crate::formatter;
use crate::types::{CellValue, ColumnIndex};

static EMPTY_CELL: CellValue = CellValue::Empty;

/// An in-memory source table with 1-based physical addressing: `cell(1, ..)`
/// is the header row, `cell(2, ..)` the first data row.
#[derive(Debug)]
pub(crate) struct SourceTable {
    path: PathBuf,
    rows: Vec<Vec<CellValue>>,
}

impl SourceTable {
    /// Read a source file, choosing the backend by extension.
    ///
    /// # Errors
    ///
    /// * `HwpxGenError::MalformedSource` when the file cannot be decoded or
    ///   parsed, or carries an unsupported extension
    pub fn open(path: &Path) -> Result<Self, HwpxGenError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let rows = match ext.as_str() {
            "csv" | "txt" => delimited::read_rows(path)?,
            "xlsx" => workbook::read_rows(path)?,
            _ => {
                return Err(HwpxGenError::MalformedSource {
                    path: path.display().to_string(),
                    reason: format!("unsupported source extension '{ext}'"),
                })
            }
        };

        Ok(SourceTable {
            path: path.to_path_buf(),
            rows,
        })
    }

    #[cfg(test)]
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        SourceTable {
            path: PathBuf::from("<memory>"),
            rows,
        }
    }

    /// Effective number of data rows: the last physical row whose cell in
    /// `count_column` is non-empty, minus the header. Rows past that boundary
    /// are never read even when physically present.
    pub fn row_count(&self, count_column: ColumnIndex) -> usize {
        let mut last_physical = 0;
        for (idx, row) in self.rows.iter().enumerate().skip(1) {
            let cell = row.get(count_column.index() - 1).unwrap_or(&EMPTY_CELL);
            if !cell.is_empty() {
                last_physical = idx + 1;
            }
        }
        last_physical.saturating_sub(1)
    }

    /// Cell at a 1-based physical row and column. Out-of-range addresses
    /// read as empty, matching how short rows behave in the sources.
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        if row == 0 || column == 0 {
            return &EMPTY_CELL;
        }
        self.rows
            .get(row - 1)
            .and_then(|r| r.get(column - 1))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Display text of a cell (dates as `YYYY-MM-DD`).
    pub fn text_at(&self, row: usize, column: usize) -> String {
        formatter::render_cell(self.cell(row, column))
    }

    /// Monetary value of a cell. Text cells may carry thousands commas.
    ///
    /// # Errors
    ///
    /// `HwpxGenError::InvalidAmount` naming `key` when the cell is not
    /// representable as a non-negative integer.
    pub fn amount_at(&self, row: usize, column: usize, key: &str) -> Result<u64, HwpxGenError> {
        let cell = self.cell(row, column);
        let parsed = match cell {
            CellValue::Integer(i) if *i >= 0 => Some(*i as u64),
            CellValue::Float(f) if *f >= 0.0 && f.fract() == 0.0 && *f < u64::MAX as f64 => {
                Some(*f as u64)
            }
            CellValue::Text(s) => s.trim().replace(',', "").parse::<u64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| HwpxGenError::InvalidAmount {
            key: key.to_string(),
            row,
            value: formatter::render_cell(cell),
        })
    }

    /// Path of the backing file, for reporting.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
