//! Formatter Module
//!
//! Korean-numeral amount rendering and cell display formatting.
//!
//! Amount words follow the conventional reading used on tax notices: digit
//! names 일..구 with sub-units 십/백/천 inside each 4-digit group and big
//! units 만/억/조/경 at group boundaries. The leading 일 of 천 is dropped
//! (1000 reads 천, not 일천); 일십 and 일백 keep it, matching the notice
//! wording 금일십이만팔천육백원정 for 128,600.

use crate::types::CellValue;

const DIGIT_NAMES: [&str; 9] = ["일", "이", "삼", "사", "오", "육", "칠", "팔", "구"];
const SUB_UNITS: [&str; 4] = ["", "십", "백", "천"];
// Entries past 경 wrap back down; magnitudes that large never occur on a
// notice but the table keeps the legacy shape.
const BIG_UNITS: [&str; 10] = ["", "만", "억", "조", "경", "해", "경", "조", "억", "만"];

/// Render a non-negative amount as Korean numeral words wrapped in the fixed
/// notice phrase: `128600` becomes `금일십이만팔천육백원정`.
///
/// The caller supplies any surrounding parenthesis or label text.
pub fn to_korean_words(amount: u64) -> String {
    let digits = amount.to_string();
    let len = digits.len();
    let mut words = String::new();

    for (i, ch) in digits.chars().enumerate() {
        let num = (ch as u8 - b'0') as usize;
        let position = len - 1 - i;
        let sub = position % 4;

        if num != 0 {
            // 천 drops the redundant 일 syllable
            if !(num == 1 && sub == 3) {
                words.push_str(DIGIT_NAMES[num - 1]);
            }
            words.push_str(SUB_UNITS[sub]);
        }
        // A group boundary emits its big unit even when the group held only
        // zeros; the trailing ones group never does.
        if sub == 0 && i < len - 1 {
            words.push_str(BIG_UNITS[position / 4]);
        }
    }

    format!("금{words}원정")
}

/// Thousands-grouped numeral with the currency suffix: `1234567` becomes
/// `1,234,567원`.
pub fn to_grouped_numeral(amount: u64) -> String {
    format!("{}원", group_thousands(amount))
}

/// Bare thousands grouping, used for per-item monetary cells.
pub(crate) fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Display form of a cell for placeholder substitution. Dates render as
/// `YYYY-MM-DD`; floats that carry an integral value drop the fraction.
pub(crate) fn render_cell(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Integer(i) => i.to_string(),
        CellValue::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        CellValue::Empty => String::new(),
    }
}
