//! Workbook backend.
//!
//! Wraps calamine and maps its cell data onto [`CellValue`]. Only the first
//! worksheet is read; notice exports carry a single sheet. Date cells are
//! resolved from the 1900-epoch serial here so the rest of the crate never
//! sees raw serial numbers.

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};
use std::path::Path;

use crate::error::HwpxGenError;
use crate::types::CellValue;

pub(super) fn read_rows(path: &Path) -> Result<Vec<Vec<CellValue>>, HwpxGenError> {
    let mut sheets = open_workbook_auto(path).map_err(|e| HwpxGenError::MalformedSource {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let sheet_name = sheets
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| HwpxGenError::MalformedSource {
            path: path.display().to_string(),
            reason: "workbook has no sheets".to_string(),
        })?;

    let range = sheets
        .worksheet_range(&sheet_name)
        .map_err(|e| HwpxGenError::MalformedSource {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    // Preserve physical addressing: the used range may not start at A1.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
    for sheet_row in range.rows() {
        let mut row = vec![CellValue::Empty; start_col as usize];
        row.extend(sheet_row.iter().map(convert_cell));
        rows.push(row);
    }
    Ok(rows)
}

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => {
            if s.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => match serial_to_date(dt.as_f64()) {
            Some(date) => CellValue::Date(date),
            None => CellValue::Empty,
        },
        Data::DateTimeIso(s) => match NaiveDate::parse_from_str(&s[..s.len().min(10)], "%Y-%m-%d") {
            Ok(date) => CellValue::Date(date),
            Err(_) => CellValue::Text(s.clone()),
        },
        Data::Empty => CellValue::Empty,
        _ => CellValue::Empty,
    }
}

/// 1900-system serial date. Day 0 of the epoch is 1899-12-30, which absorbs
/// the historical 1900 leap-year quirk for every date after 1900-02-28.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}
