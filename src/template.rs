//! Template Module
//!
//! Placeholder substitution over the raw text of the section XML. The
//! document part is small enough that a DOM buys nothing; all rewriting is
//! plain string splicing, encapsulated in [`TemplateText`] so the resolution
//! pipeline stays testable on its own.
//!
//! Two placeholder grammars coexist in a template:
//!
//! * positional tokens `%A2%`..`%E2%` (header fields) and `%F{row}%`..
//!   `%L{row}%` (per-item fields), addressing cells directly;
//! * named tokens such as `%세목%`, rewritten into positional tokens through
//!   the field mapping before any value substitution.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::HwpxGenError;
use crate::formatter;
use crate::mapping::FieldMapping;
use crate::parser::SourceTable;
use crate::types::ColumnIndex;

/// Closing tag the layout fix is anchored to.
const LINESEG_ANCHOR: &str = "</hp:linesegarray>";

/// Extra line segment inserted for the overlap-prone field. The geometry is
/// fixed; it matches the second text line the viewer fails to reserve.
const LINESEG_FIX: &str = "<hp:lineseg textpos=\"4\" vertpos=\"1600\" vertsize=\"1000\" \
textheight=\"1000\" baseline=\"850\" spacing=\"600\" horzpos=\"0\" horzsize=\"4348\" \
flags=\"393216\"/>";

/// Aggregate tokens, fixed wire names inherited from the template family.
const TOTAL_TOKEN: &str = "%TAX_TOTAL_AMOUNT%";
const TOTAL_STR_TOKEN: &str = "%TAX_TOTAL_AMOUNT_STR%";

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"%([0-9A-Za-z_\p{Hangul}]+)%").expect("token pattern"))
}

fn positional_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-L][0-9]+$").expect("positional pattern"))
}

/// Template text under rewriting.
pub(crate) struct TemplateText {
    text: String,
}

impl TemplateText {
    pub fn new(text: String) -> Self {
        TemplateText { text }
    }

    /// Distinct named-token keys in document order. Positional tokens and the
    /// reserved aggregate tokens are not named tokens.
    pub fn named_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for capture in token_pattern().captures_iter(&self.text) {
            let key = &capture[1];
            if positional_pattern().is_match(key) {
                continue;
            }
            if key == TOTAL_TOKEN.trim_matches('%') || key == TOTAL_STR_TOKEN.trim_matches('%') {
                continue;
            }
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
        keys
    }

    /// Number of `%...%` tokens of any grammar still present.
    pub fn token_count(&self) -> usize {
        token_pattern().find_iter(&self.text).count()
    }

    pub fn count_occurrences(&self, token: &str) -> usize {
        self.text.matches(token).count()
    }

    /// Replace the leftmost occurrence of `token`. Returns whether one was
    /// found; each call consumes exactly one occurrence.
    pub fn replace_next_occurrence(&mut self, token: &str, replacement: &str) -> bool {
        match self.text.find(token) {
            Some(pos) => {
                self.text.replace_range(pos..pos + token.len(), replacement);
                true
            }
            None => false,
        }
    }

    pub fn replace_all(&mut self, token: &str, replacement: &str) {
        if self.text.contains(token) {
            self.text = self.text.replace(token, replacement);
        }
    }

    /// For every positional token of `column`, insert `fragment` immediately
    /// before the nearest following `anchor`. Runs back to front so earlier
    /// token positions stay valid while splicing.
    pub fn insert_before_following_anchor(
        &mut self,
        column: ColumnIndex,
        anchor: &str,
        fragment: &str,
    ) {
        let pattern = Regex::new(&format!("%{}[0-9]+%", column.letter())).expect("column pattern");
        let token_ends: Vec<usize> = pattern.find_iter(&self.text).map(|m| m.end()).collect();
        for end in token_ends.into_iter().rev() {
            if let Some(rel) = self.text[end..].find(anchor) {
                self.text.insert_str(end + rel, fragment);
            }
        }
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Resolve a template against a source table, producing the final section
/// text. Implements the full substitution pipeline: named-token rewriting,
/// the overlap layout fix, header and per-row substitution, and the
/// aggregate totals.
///
/// # Errors
///
/// * `HwpxGenError::Template` when the template holds no substitutable
///   placeholders, or a named token occurs more often than there are data
///   rows to back it
/// * `HwpxGenError::InvalidAmount` for non-numeric monetary cells
pub(crate) fn resolve(
    template: &str,
    mapping: &FieldMapping,
    table: &SourceTable,
    count_column: ColumnIndex,
) -> Result<String, HwpxGenError> {
    let row_count = table.row_count(count_column);
    let mut text = TemplateText::new(template.to_string());

    if text.token_count() == 0 {
        return Err(HwpxGenError::Template(
            "no substitutable placeholders found in the template".to_string(),
        ));
    }

    // 1-2. Rewrite named tokens into positional tokens, left to right, one
    // occurrence per step. Occurrence i addresses row i + 1; the first data
    // row sits at physical row 2. An occurrence past the data fails closed
    // instead of leaving a token no later step can resolve.
    for key in text.named_keys() {
        let Some(column) = mapping.resolve(&key) else {
            log::debug!("named token '%{key}%' has no mapping entry, left verbatim");
            continue;
        };
        let token = format!("%{key}%");
        let occurrences = text.count_occurrences(&token);
        for i in 0..occurrences {
            let row = i + 2;
            if row > row_count + 1 {
                return Err(HwpxGenError::Template(format!(
                    "token '%{key}%' occurs {occurrences} times but the source has only \
                     {row_count} data row(s)"
                )));
            }
            text.replace_next_occurrence(&token, &format!("%{}{row}%", column.letter()));
        }
    }

    // 3. Layout fix for the overlap-prone field, before values replace the
    // tokens the anchors are located from.
    if let Some(column) = mapping.overlap_column() {
        text.insert_before_following_anchor(column, LINESEG_ANCHOR, LINESEG_FIX);
    }

    // 4. Header fields: %A2%..%E2% echo the first five cells of physical
    // row 2.
    for column in 1..=5 {
        let letter = (b'A' + column as u8 - 1) as char;
        let token = format!("%{letter}2%");
        text.replace_all(&token, &table.text_at(2, column));
    }

    // 5. Per-item fields F..L for every data row; monetary columns grouped,
    // the total column accumulated.
    let monetary = mapping.monetary_columns();
    let total_column = mapping.total_column();
    let mut total: u64 = 0;

    for data_row in 1..=row_count {
        let physical_row = data_row + 1;
        for column in ColumnIndex::FIRST_ITEM.index()..=ColumnIndex::LAST.index() {
            let column_index = ColumnIndex::from_number(column)?;
            let token = format!("%{}{}%", column_index.letter(), physical_row);
            let value = if monetary.contains(&column_index) {
                let key = mapping.monetary_key_for(column_index).unwrap_or("금액");
                let amount = table.amount_at(physical_row, column, key)?;
                if total_column == Some(column_index) {
                    total += amount;
                }
                formatter::group_thousands(amount)
            } else {
                table.text_at(physical_row, column)
            };
            text.replace_all(&token, &value);
        }
    }

    // 6. Aggregate totals, numeric and words forms.
    let grouped = formatter::to_grouped_numeral(total);
    let with_words = format!("{grouped}({})", formatter::to_korean_words(total));
    text.replace_all(TOTAL_STR_TOKEN, &with_words);
    text.replace_all(TOTAL_TOKEN, &grouped);

    Ok(text.into_string())
}
