//! Types Module
//!
//! Shared value types used across the crate.

use crate::error::HwpxGenError;
use chrono::NaiveDate;

/// 1-based spreadsheet column restricted to the template-supported range A..L.
///
/// Templates address at most twelve columns: A..E hold the header fields and
/// F..L the per-item fields. A configured column outside that range is a
/// configuration mistake and is rejected when the mapping is loaded, not at
/// substitution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnIndex(u8);

impl ColumnIndex {
    /// First column of the per-item field range (F).
    pub const FIRST_ITEM: ColumnIndex = ColumnIndex(6);
    /// Column G, the payment-number column every notice layout counts rows by.
    pub const COUNT_DEFAULT: ColumnIndex = ColumnIndex(7);
    /// Last supported column (L).
    pub const LAST: ColumnIndex = ColumnIndex(12);

    /// Parse a single column letter, case-insensitive.
    ///
    /// # Errors
    ///
    /// `HwpxGenError::Config` if the input is not exactly one letter in A..L.
    pub fn parse(s: &str) -> Result<Self, HwpxGenError> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_letter(c),
            _ => Err(HwpxGenError::Config(format!(
                "column must be a single letter A..L, got '{trimmed}'"
            ))),
        }
    }

    /// Convert a column letter to its index.
    pub fn from_letter(letter: char) -> Result<Self, HwpxGenError> {
        let upper = letter.to_ascii_uppercase();
        if !('A'..='L').contains(&upper) {
            return Err(HwpxGenError::Config(format!(
                "column '{letter}' is outside the supported range A..L"
            )));
        }
        Ok(ColumnIndex(upper as u8 - b'A' + 1))
    }

    /// Build from a 1-based numeric index.
    pub(crate) fn from_number(index: usize) -> Result<Self, HwpxGenError> {
        if !(1..=12).contains(&index) {
            return Err(HwpxGenError::Config(format!(
                "column index {index} is outside the supported range 1..12"
            )));
        }
        Ok(ColumnIndex(index as u8))
    }

    /// The column letter ('A'..'L').
    pub fn letter(self) -> char {
        (b'A' + self.0 - 1) as char
    }

    /// 1-based numeric index (A = 1).
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ColumnIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A typed source-table cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    /// Text cell (every CSV cell lands here).
    Text(String),

    /// Integer-typed workbook cell.
    Integer(i64),

    /// Float-typed workbook cell.
    Float(f64),

    /// Date-typed workbook cell, already resolved from the Excel serial.
    Date(NaiveDate),

    /// Empty cell.
    Empty,
}

impl CellValue {
    /// Whether the cell counts as empty for row-count purposes.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}
