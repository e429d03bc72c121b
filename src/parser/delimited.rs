//! Delimited-text backend.
//!
//! The whole file is decoded up front (UTF-8 first, then EUC-KR, the
//! encoding legacy spreadsheets export to) and handed to the csv reader.
//! Every cell stays text-typed; numeric interpretation happens at the
//! substitution site.

use std::path::Path;

use crate::error::HwpxGenError;
use crate::types::CellValue;

pub(super) fn read_rows(path: &Path) -> Result<Vec<Vec<CellValue>>, HwpxGenError> {
    let bytes = std::fs::read(path)?;
    let text = decode(&bytes).ok_or_else(|| HwpxGenError::MalformedSource {
        path: path.display().to_string(),
        reason: "neither UTF-8 nor EUC-KR".to_string(),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| HwpxGenError::MalformedSource {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(rows)
}

fn decode(bytes: &[u8]) -> Option<String> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Some(s.to_string());
    }
    let (decoded, _, had_errors) = encoding_rs::EUC_KR.decode(bytes);
    if had_errors {
        None
    } else {
        Some(decoded.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_utf8_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "관리번호,성명\nA-1,홍길동\n").unwrap();
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], CellValue::Text("홍길동".to_string()));
    }

    #[test]
    fn test_reads_euc_kr_csv() {
        let (encoded, _, _) = encoding_rs::EUC_KR.encode("성명,주소\n김철수,대전\n");
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(&encoded).unwrap();
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows[1][0], CellValue::Text("김철수".to_string()));
    }

    #[test]
    fn test_empty_fields_are_empty_cells() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "a,b,c\n1,,3\n").unwrap();
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows[1][1], CellValue::Empty);
    }
}
