//! Common regex patterns for card statement extraction.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::statement::Field;

/// Single currency marker the normalizer collapses every rupee notation into.
pub const CURRENCY_MARKER: &str = "₹";

// Building blocks for the labeled patterns below.
const DMY: &str = r"\d{1,2}[/-]\d{1,2}[/-]\d{4}";
const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";
const CURRENCY: &str = r"(?:₹|INR|CURR|Rs\.?)?";
const NUMBER: &str = r"(\d[\d,]*(?:\.\d+)?)";
const SEP: &str = r"\s*[:\-]?\s*";

fn verbose_date() -> String {
    format!(r"{MONTH}\.?\s+\d{{1,2}},?\s+\d{{4}}")
}

fn labeled_amount(label: &str) -> Regex {
    Regex::new(&format!(
        r"(?i){label}{SEP}\*?\s*{CURRENCY}\s*{NUMBER}(?:\s*Dr\b)?"
    ))
    .unwrap()
}

fn labeled_date(label: &str) -> Regex {
    Regex::new(&format!(r"(?i){label}{SEP}({DMY}|{})", verbose_date())).unwrap()
}

/// Label matcher for a field: any label phrase not directly preceded by one
/// of the qualifier words that turn it into a different quantity
/// ("Minimum Amount Due", "Available Credit Limit").
pub struct FieldLabels {
    pub labels: Regex,
    pub exclude: Option<Regex>,
}

impl FieldLabels {
    fn new(labels: &str, exclude: Option<&str>) -> Self {
        Self {
            labels: Regex::new(&format!("(?i){labels}")).unwrap(),
            exclude: exclude.map(|e| Regex::new(&format!("(?i){e}")).unwrap()),
        }
    }

    /// Byte offset of the first qualifying label in the text.
    pub fn find(&self, text: &str) -> Option<usize> {
        self.labels
            .find_iter(text)
            .map(|m| m.start())
            .find(|&start| !self.excluded_at(text, start))
    }

    /// Check if the text carries this field's label.
    pub fn matches(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// Whether a match starting at `start` is qualified away.
    pub fn excluded_at(&self, text: &str, start: usize) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|e| e.is_match(preceding(text, start, QUALIFIER_WINDOW)))
    }
}

/// Characters inspected before a label for qualifier words.
const QUALIFIER_WINDOW: usize = 16;

/// Up to `chars` characters immediately before byte offset `start`.
pub fn preceding(text: &str, start: usize, chars: usize) -> &str {
    let head = &text[..start];
    let from = head
        .char_indices()
        .rev()
        .nth(chars.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    &head[from..]
}

/// Up to `chars` characters of the text.
pub fn take_chars(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

lazy_static! {
    // Normalizer
    pub static ref CURRENCY_SYMBOL: Regex = Regex::new(r"(?:₹|`)\s*").unwrap();

    pub static ref RUPEE_ABBREVIATION: Regex = Regex::new(r"\bRs\.?\s*(\d)").unwrap();

    pub static ref RUPEE_ARTIFACT: Regex = Regex::new(r"\br(\d)").unwrap();

    pub static ref DEBIT_CREDIT_SUFFIX: Regex = Regex::new(r"(\d)(Dr|Cr|DR|CR)\b").unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Dates
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b"
    ).unwrap();

    pub static ref DATE_VERBOSE: Regex = Regex::new(
        &format!(r"(?i)\b({})\b", verbose_date())
    ).unwrap();

    pub static ref DATE_RANGE_DMY: Regex = Regex::new(
        &format!(r"(?i)\b({DMY})\s*(?:-|–|to)\s*({DMY})\b")
    ).unwrap();

    pub static ref DATE_RANGE_VERBOSE: Regex = Regex::new(
        &format!(r"(?i)\b({v})\s*(?:-|–|to)\s*({v})\b", v = verbose_date())
    ).unwrap();

    /// "Immediate" as the whole value, e.g. the cell or block under a due label.
    pub static ref IMMEDIATE_VALUE: Regex =
        Regex::new(r"(?i)^[\s:\-]*(?:payable\s+)?immediate(?:ly)?\b").unwrap();

    // Numbers
    pub static ref NUMERIC_TOKEN: Regex = Regex::new(r"\d[\d,]*(?:\.\d+)?").unwrap();

    pub static ref DIGIT_RUN: Regex = Regex::new(r"\d+").unwrap();

    // Field labels for table cells and blocks
    pub static ref CARD_LABELS: FieldLabels = FieldLabels::new(
        r"card\s*(?:no\b|no\.|number|num\b)|card\s+ending|ending\s+(?:in|with)|primary\s+card",
        None,
    );

    pub static ref PERIOD_LABELS: FieldLabels = FieldLabels::new(
        r"statement\s+period|billing\s+(?:period|cycle)|statement\s+cycle",
        None,
    );

    pub static ref DUE_DATE_LABELS: FieldLabels = FieldLabels::new(
        r"payment\s+due\s+date|due\s+date|pay\s+by|payment\s+due",
        Some(r"\btotal\s*$"),
    );

    pub static ref AMOUNT_DUE_LABELS: FieldLabels = FieldLabels::new(
        r"total\s+(?:amount|payment)\s+due|total\s+dues|amount\s+payable|total\s+outstanding|new\s+balance",
        Some(r"\bmin(?:imum|\.)?\b"),
    );

    pub static ref CREDIT_LIMIT_LABELS: FieldLabels = FieldLabels::new(
        r"credit\s+limit|card\s+limit|total\s+limit",
        Some(r"\bavailable\b|\bavl\.?\b|\bcash\b"),
    );

    // Summary zone
    pub static ref SUMMARY_HEADER: Regex = Regex::new(
        r"(?i)\b(?:payment|statement|account|credit(?:\s+card)?)\s+summary\b"
    ).unwrap();

    pub static ref TRANSACTION_ANCHOR: Regex = Regex::new(
        r"(?i)\b(?:transaction\s+details|domestic\s+transactions|international\s+transactions|your\s+transactions|transactions\s+(?:for|during)|date\s+transaction\s+description)\b"
    ).unwrap();

    pub static ref NOISE: Regex = Regex::new(
        r"(?i)\b(?:rewards?|points|multiplier|\d+\s*x|cash\s*back|gst|igst|cgst|sgst|tax(?:es)?|promo(?:tion(?:al)?)?|offers?)\b"
    ).unwrap();

    // Global card patterns, most specific first
    pub static ref CARD_MASKED: Vec<Regex> = [
        r"\d{6}\*+(\d{4})\b",
        r"\d{4}[\s-]?[X*]{4}[\s-]?[X*]{4}[\s-]?(\d{4})\b",
        r"[X*]{4}[\s-]?[X*]{4}[\s-]?[X*]{4}[\s-]?(\d{4})\b",
        r"\d{2,6}[X*•]{4,}(\d{4})\b",
        r"[X*•]{8,}(\d{4})\b",
        r"X{4}\s+(\d{4})\b",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
    .collect();

    pub static ref CARD_LABELED: Vec<Regex> = [
        r"card\s+(?:number|no\.?)\s*:?\s*[\dX*•\s-]*?(\d{4})\b",
        r"ending\s+(?:in|with)\s*:?\s*(\d{4})\b",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
    .collect();

    // Global statement period patterns
    pub static ref PERIOD_LABEL: Regex = Regex::new(
        r"(?i)statement\s+period|billing\s+(?:period|cycle)|statement\s+cycle"
    ).unwrap();

    pub static ref PERIOD_RANGES: Vec<Regex> = vec![
        Regex::new(&format!(
            r"(?i)(?:statement\s+period|billing\s+cycle|billing\s+period){SEP}({DMY})\s*(?:-|to)\s*({DMY})"
        )).unwrap(),
        Regex::new(&format!(r"(?i)\bfrom\s+({DMY})\s+to\s+({DMY})")).unwrap(),
        Regex::new(&format!(r"\b({DMY})\s*-\s*({DMY})\b")).unwrap(),
        Regex::new(&format!(r"(?i)\b({DMY})\s+to\s+({DMY})\b")).unwrap(),
    ];

    pub static ref PERIOD_SINGLE: Regex =
        labeled_date(r"(?:statement\s+period|statement\s+date|billing\s+date)");

    // Global due date patterns
    pub static ref DUE_IMMEDIATE: Regex = Regex::new(
        r"(?i)(?:payment\s+)?due\s+(?:date\s*)?[:\-]?\s*immediate(?:ly)?\b|\bpay(?:ment)?\s+(?:is\s+)?(?:due\s+)?immediately\b"
    ).unwrap();

    pub static ref DUE_DATE_LABELED: Vec<Regex> = [
        r"payment\s+due\s+date",
        r"due\s+date",
        r"pay\s+by",
        r"payment\s+deadline",
    ]
    .iter()
    .map(|label| labeled_date(label))
    .collect();

    pub static ref DUE_DATE_LOOSE: Vec<Regex> = vec![
        Regex::new(&format!(r"(?i)last\s+date.{{0,40}}?payment{SEP}({DMY})")).unwrap(),
        labeled_date(r"due\s+on"),
    ];

    // Global amount patterns
    pub static ref AMOUNT_DUE_LABELED: Vec<Regex> = [
        r"total\s+(?:payment|amount)\s+due",
        r"total\s+dues",
        r"amount\s+payable",
        r"total\s+outstanding",
        r"outstanding\s+(?:amount|balance)",
        r"new\s+balance",
        r"total\s+due",
    ]
    .iter()
    .map(|label| labeled_amount(label))
    .collect();

    pub static ref AMOUNT_DUE_LOOSE: Regex = labeled_amount(r"amount\s+due");

    pub static ref CREDIT_LIMIT_LABELED: Vec<Regex> = [
        r"(?:total\s+)?credit\s+limit",
        r"card\s+limit",
        r"total\s+limit",
    ]
    .iter()
    .map(|label| labeled_amount(label))
    .collect();

    pub static ref SUMMARY_KEYWORD: Regex = Regex::new(
        r"(?i)\b(?:account|credit|card|payment)\s+summary\b"
    ).unwrap();
}

/// Label matcher for a field.
pub fn field_labels(field: Field) -> &'static FieldLabels {
    match field {
        Field::CardLast4 => &CARD_LABELS,
        Field::StatementPeriod => &PERIOD_LABELS,
        Field::DueDate => &DUE_DATE_LABELS,
        Field::AmountDue => &AMOUNT_DUE_LABELS,
        Field::CreditLimit => &CREDIT_LIMIT_LABELS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_labels_skip_minimum_due() {
        assert!(AMOUNT_DUE_LABELS.matches("Total Amount Due"));
        assert!(!AMOUNT_DUE_LABELS.matches("Minimum Amount Due"));
    }

    #[test]
    fn test_credit_labels_skip_available_and_cash() {
        assert!(CREDIT_LIMIT_LABELS.matches("Credit Limit"));
        assert!(!CREDIT_LIMIT_LABELS.matches("Available Credit Limit"));
        assert!(!CREDIT_LIMIT_LABELS.matches("Cash Limit"));
    }

    #[test]
    fn test_due_labels_skip_total_payment_due() {
        assert!(DUE_DATE_LABELS.matches("Payment Due Date"));
        assert!(DUE_DATE_LABELS.matches("Payment Due"));
        assert!(!DUE_DATE_LABELS.matches("Total Payment Due"));

        let text = "Total Payment Due ₹78,708.38 Payment Due Date 04/11/2021";
        assert_eq!(DUE_DATE_LABELS.find(text), text.find("Payment Due Date"));
    }

    #[test]
    fn test_qualifier_only_applies_to_its_label() {
        let text = "Minimum Amount Payable 3,935.42 Total Amount Due 78,708.38";
        assert_eq!(AMOUNT_DUE_LABELS.find(text), Some(32));
        assert!(!AMOUNT_DUE_LABELS.matches("Minimum Amount Payable 3,935.42"));
    }

    #[test]
    fn test_char_windows() {
        assert_eq!(preceding("Available Credit Limit", 10, 16), "Available ");
        assert_eq!(preceding("₹ Credit", 4, 2), "₹ ");
        assert_eq!(take_chars("₹ 1,000", 3), "₹ 1");
        assert_eq!(take_chars("abc", 10), "abc");
    }

    #[test]
    fn test_noise_terms() {
        assert!(NOISE.is_match("Reward Points earned"));
        assert!(NOISE.is_match("10X rewards on dining"));
        assert!(NOISE.is_match("IGST @18%"));
        assert!(!NOISE.is_match("4375 XXXX XXXX 7381"));
        assert!(!NOISE.is_match("Total Amount Due"));
    }

    #[test]
    fn test_summary_and_anchor() {
        assert!(SUMMARY_HEADER.is_match("PAYMENT SUMMARY"));
        assert!(SUMMARY_HEADER.is_match("Credit Card Summary"));
        assert!(TRANSACTION_ANCHOR.is_match("Domestic Transactions"));
    }
}
