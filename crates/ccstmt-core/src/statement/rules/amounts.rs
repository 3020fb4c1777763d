//! Amount extraction for card statements.

use crate::models::config::Bounds;

use super::FieldExtractor;
use super::dates::strip_dates;
use super::patterns::NUMERIC_TOKEN;

/// Amount extractor accepting only values inside a plausibility window.
pub struct AmountExtractor {
    bounds: Bounds,
}

impl AmountExtractor {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = f64;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let text = strip_dates(text);
        NUMERIC_TOKEN
            .find_iter(&text)
            .filter_map(|m| parse_amount(m.as_str()))
            .filter(|v| self.bounds.contains(*v))
            .collect()
    }
}

/// Parse an amount such as "78,708.38" or "1,32,000" (Indian grouping).
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an amount and check it against a window.
pub fn parse_bounded(s: &str, bounds: Bounds) -> Option<f64> {
    parse_amount(s).filter(|v| bounds.contains(*v))
}

/// Format an amount with Indian digit grouping (1,32,000.00).
pub fn format_inr(amount: f64) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let digits: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    let len = digits.len();

    for (i, c) in digits.iter().enumerate() {
        let remaining = len - i;
        if i > 0 && (remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)) {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{formatted}.{decimal_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMOUNT_DUE: Bounds = Bounds::new(50.0, 1_000_000.0);

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("78,708.38"), Some(78708.38));
        assert_eq!(parse_amount("1,32,000"), Some(132000.0));
        assert_eq!(parse_amount("1,32,000.00"), Some(132000.0));
        assert_eq!(parse_amount(","), None);
        assert_eq!(parse_amount("1.2.3"), None);
    }

    #[test]
    fn test_first_in_bounds_token_wins() {
        let extractor = AmountExtractor::new(AMOUNT_DUE);
        assert_eq!(extractor.extract("Due 12 days, total 78,708.38 Dr"), Some(78708.38));
        assert_eq!(extractor.extract("45 and 2,00,00,000"), None);
    }

    #[test]
    fn test_dates_are_not_amounts() {
        let extractor = AmountExtractor::new(AMOUNT_DUE);
        assert_eq!(extractor.extract("as of 15/10/2021 ₹ 3,935.42"), Some(3935.42));
    }

    #[test]
    fn test_parse_bounded() {
        assert_eq!(parse_bounded("50", AMOUNT_DUE), None);
        assert_eq!(parse_bounded("50.01", AMOUNT_DUE), Some(50.01));
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(132000.0), "1,32,000.00");
        assert_eq!(format_inr(78708.38), "78,708.38");
        assert_eq!(format_inr(999.5), "999.50");
        assert_eq!(format_inr(12345678.9), "1,23,45,678.90");
    }
}
