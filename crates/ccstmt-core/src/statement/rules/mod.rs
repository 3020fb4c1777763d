//! Rule-based value extractors for card statements.

pub mod amounts;
pub mod card;
pub mod dates;
pub mod normalize;
pub mod patterns;

pub use amounts::{AmountExtractor, format_inr, parse_amount, parse_bounded};
pub use card::CardDigitsExtractor;
pub use dates::{
    DateExtractor, IMMEDIATE_DUE, dmy_dates, earliest_pair, join_range, parse_dmy, parse_verbose,
};
pub use normalize::normalize;

use crate::models::config::{Bounds, ExtractionConfig};
use crate::models::statement::{Field, FieldValue};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Type class of a field, decided once per field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    /// A four-digit string.
    Digits,
    /// A date, a date range, or (when allowed) "Immediate". Periods also
    /// pair two loose dates chronologically.
    DateOrRange { immediate: bool, period: bool },
    /// An amount inside a plausibility window.
    Money(Bounds),
}

impl ValueKind {
    /// Value kind for a field under the given configuration.
    pub fn for_field(field: Field, config: &ExtractionConfig) -> Self {
        match field {
            Field::CardLast4 => ValueKind::Digits,
            Field::StatementPeriod => ValueKind::DateOrRange {
                immediate: false,
                period: true,
            },
            Field::DueDate => ValueKind::DateOrRange {
                immediate: true,
                period: false,
            },
            Field::AmountDue => ValueKind::Money(config.amount_due_bounds),
            Field::CreditLimit => ValueKind::Money(config.credit_limit_bounds),
        }
    }

    /// Turn a raw candidate into a validated value, or reject it.
    pub fn extract(&self, candidate: &str) -> Option<FieldValue> {
        match self {
            ValueKind::Digits => CardDigitsExtractor::new()
                .extract(candidate)
                .map(FieldValue::Digits),
            ValueKind::DateOrRange { immediate, period } => DateExtractor::new()
                .with_immediate(*immediate)
                .with_loose_pairs(*period)
                .extract(candidate)
                .map(FieldValue::Date),
            ValueKind::Money(bounds) => AmountExtractor::new(*bounds)
                .extract(candidate)
                .map(FieldValue::Money),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_per_field() {
        let config = ExtractionConfig::default();
        assert_eq!(ValueKind::for_field(Field::CardLast4, &config), ValueKind::Digits);
        assert_eq!(
            ValueKind::for_field(Field::DueDate, &config),
            ValueKind::DateOrRange {
                immediate: true,
                period: false
            }
        );
        assert_eq!(
            ValueKind::for_field(Field::CreditLimit, &config),
            ValueKind::Money(Bounds::new(1_000.0, 5_000_000.0))
        );
    }

    #[test]
    fn test_extract_tagged_values() {
        let config = ExtractionConfig::default();

        assert_eq!(
            ValueKind::for_field(Field::CardLast4, &config).extract("XXXX 7381"),
            Some(FieldValue::Digits("7381".into()))
        );
        assert_eq!(
            ValueKind::for_field(Field::StatementPeriod, &config).extract("Immediate"),
            None
        );
        assert_eq!(
            ValueKind::for_field(Field::CreditLimit, &config).extract("Limit 900 / 1,32,000.00"),
            Some(FieldValue::Money(132000.0))
        );
        assert_eq!(ValueKind::for_field(Field::AmountDue, &config).extract("N/A"), None);
    }
}
