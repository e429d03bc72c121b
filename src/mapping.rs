//! Field Mapping Module
//!
//! Loads the key → column configuration that binds semantic field names used
//! by templates (세목, 본세, ...) to spreadsheet columns. The format is the
//! classic one-section ini shape:
//!
//! ```text
//! [fields]
//! 세목 = F
//! 본세 = J
//! 합계세액 = L
//! ```
//!
//! Lines are decoded independently as UTF-8 with an EUC-KR fallback, so a
//! single mis-encoded entry is reported and skipped without losing the rest
//! of the configuration.

use std::collections::HashMap;
use std::path::Path;

use crate::error::HwpxGenError;
use crate::types::ColumnIndex;

/// Keys whose mapped columns hold monetary values and therefore get
/// thousands grouping during row substitution.
pub(crate) const MONETARY_KEYS: [&str; 3] = ["본세", "가산금", "합계세액"];

/// The monetary key whose column feeds the aggregate total.
pub(crate) const TOTAL_KEY: &str = "합계세액";

/// Key for the field whose rendered text overlaps in the viewer unless a
/// corrective line segment is inserted.
pub(crate) const OVERLAP_KEY: &str = "과세대상";

/// Immutable key → column mapping, loaded once per run.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    entries: HashMap<String, ColumnIndex>,
}

impl FieldMapping {
    /// Load the mapping from a configuration file.
    ///
    /// # Errors
    ///
    /// * `HwpxGenError::Io` when the file cannot be read
    /// * `HwpxGenError::Config` when a mapped column is outside A..L
    pub fn load(path: &Path) -> Result<Self, HwpxGenError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, &path.display().to_string())
    }

    /// Parse mapping entries from raw bytes. `label` names the source in
    /// warnings and errors.
    pub fn from_bytes(bytes: &[u8], label: &str) -> Result<Self, HwpxGenError> {
        let mut entries = HashMap::new();

        for (line_no, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
            let Some(line) = decode_line(raw_line) else {
                log::warn!("{label}:{}: undecodable line skipped", line_no + 1);
                continue;
            };
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            // single-section format: the header itself carries no data
            if line.starts_with('[') && line.ends_with(']') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("{label}:{}: no '=' separator, line skipped", line_no + 1);
                continue;
            };
            let key = key.trim();
            let column = ColumnIndex::parse(value).map_err(|_| {
                HwpxGenError::Config(format!(
                    "{label}:{}: key '{key}' maps to '{}', outside the supported columns A..L",
                    line_no + 1,
                    value.trim()
                ))
            })?;
            // duplicate keys: last one wins
            entries.insert(key.to_string(), column);
        }

        Ok(FieldMapping { entries })
    }

    /// Column backing a semantic key, if configured.
    pub fn resolve(&self, key: &str) -> Option<ColumnIndex> {
        self.entries.get(key).copied()
    }

    /// Number of configured keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keys are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Columns requiring thousands grouping, in trio order, skipping
    /// unconfigured keys.
    pub(crate) fn monetary_columns(&self) -> Vec<ColumnIndex> {
        MONETARY_KEYS
            .iter()
            .filter_map(|key| self.resolve(key))
            .collect()
    }

    /// The configured key for a monetary column, for error reporting.
    pub(crate) fn monetary_key_for(&self, column: ColumnIndex) -> Option<&'static str> {
        MONETARY_KEYS
            .iter()
            .find(|key| self.resolve(key) == Some(column))
            .copied()
    }

    /// Column accumulated into the aggregate total.
    pub(crate) fn total_column(&self) -> Option<ColumnIndex> {
        self.resolve(TOTAL_KEY)
    }

    /// Column of the overlap-prone field, if configured.
    pub(crate) fn overlap_column(&self) -> Option<ColumnIndex> {
        self.resolve(OVERLAP_KEY)
    }
}

/// Decode one configuration line: strict UTF-8 first, then EUC-KR. `None`
/// when neither decoder accepts the bytes.
fn decode_line(bytes: &[u8]) -> Option<String> {
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

    const SAMPLE: &str = "\
[fields]
# item columns
세목 = F
전자납부번호 = G
과세기간 = H
과세대상 = I
본세 = J
가산금 = K
합계세액 = L
";

    #[test]
    fn test_parse_sample() {
        let mapping = FieldMapping::from_bytes(SAMPLE.as_bytes(), "test").unwrap();
        assert_eq!(mapping.len(), 7);
        assert_eq!(mapping.resolve("세목").unwrap().letter(), 'F');
        assert_eq!(mapping.resolve("합계세액").unwrap().letter(), 'L');
        assert!(mapping.resolve("미지정").is_none());
    }

    #[test]
    fn test_special_columns() {
        let mapping = FieldMapping::from_bytes(SAMPLE.as_bytes(), "test").unwrap();
        let monetary: Vec<char> = mapping.monetary_columns().iter().map(|c| c.letter()).collect();
        assert_eq!(monetary, vec!['J', 'K', 'L']);
        assert_eq!(mapping.total_column().unwrap().letter(), 'L');
        assert_eq!(mapping.overlap_column().unwrap().letter(), 'I');
        assert_eq!(
            mapping.monetary_key_for(ColumnIndex::parse("K").unwrap()),
            Some("가산금")
        );
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let text = "세목 = F\n세목 = H\n";
        let mapping = FieldMapping::from_bytes(text.as_bytes(), "test").unwrap();
        assert_eq!(mapping.resolve("세목").unwrap().letter(), 'H');
    }

    #[test]
    fn test_out_of_range_column_rejected_at_load() {
        let text = "세목 = M\n";
        let err = FieldMapping::from_bytes(text.as_bytes(), "test").unwrap_err();
        match err {
            HwpxGenError::Config(msg) => assert!(msg.contains('M')),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_euc_kr_lines_decode() {
        let (encoded, _, _) = encoding_rs::EUC_KR.encode("세목 = F\n본세 = J\n");
        let mapping = FieldMapping::from_bytes(&encoded, "legacy.ini").unwrap();
        assert_eq!(mapping.resolve("세목").unwrap().letter(), 'F');
        assert_eq!(mapping.resolve("본세").unwrap().letter(), 'J');
    }

    #[test]
    fn test_undecodable_line_does_not_poison_others() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"\xff\xfe\xfd = Z\n");
        bytes.extend_from_slice("세목 = F\n".as_bytes());
        let mapping = FieldMapping::from_bytes(&bytes, "test").unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.resolve("세목").unwrap().letter(), 'F');
    }

    #[test]
    fn test_malformed_line_skipped() {
        let text = "no separator here\n세목 = F\n";
        let mapping = FieldMapping::from_bytes(text.as_bytes(), "test").unwrap();
        assert_eq!(mapping.len(), 1);
    }
}
