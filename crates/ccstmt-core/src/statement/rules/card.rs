//! Card number (last four digits) extraction.

use super::FieldExtractor;
use super::dates::strip_dates;
use super::patterns::DIGIT_RUN;

/// Extracts the last four digits of a (usually masked) card number.
pub struct CardDigitsExtractor;

impl CardDigitsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CardDigitsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CardDigitsExtractor {
    type Output = String;

    /// The rightmost group is the true last-4 in masked numbers such as
    /// "4375 XXXX XXXX 7381".
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).pop()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let text = strip_dates(text);
        DIGIT_RUN
            .find_iter(&text)
            .filter(|m| m.as_str().len() == 4)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
