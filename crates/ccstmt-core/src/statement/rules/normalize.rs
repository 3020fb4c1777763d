//! Text normalization ahead of pattern matching.

use super::patterns::{
    CURRENCY_MARKER, CURRENCY_SYMBOL, DEBIT_CREDIT_SUFFIX, RUPEE_ABBREVIATION, RUPEE_ARTIFACT,
    WHITESPACE,
};

/// Canonicalize currency notation and spacing in statement text.
///
/// Every rupee notation (`₹`, the backtick glyph some fonts emit, `Rs.`
/// and a stray `r` glued to a number) becomes the single marker followed by
/// a space, `Dr`/`Cr` suffixes are split from their numbers, and
/// whitespace runs collapse to one space. Idempotent.
pub fn normalize(text: &str) -> String {
    let marker = format!("{CURRENCY_MARKER} ");
    let text = CURRENCY_SYMBOL.replace_all(text, marker.as_str());
    let text = RUPEE_ABBREVIATION.replace_all(&text, format!("{marker}${{1}}").as_str());
    let text = RUPEE_ARTIFACT.replace_all(&text, format!("{marker}${{1}}").as_str());
    let text = DEBIT_CREDIT_SUFFIX.replace_all(&text, "${1} ${2}");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}
