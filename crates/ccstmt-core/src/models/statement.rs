//! Statement extraction result model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag identifying rule-based extraction in results.
pub const EXTRACTION_METHOD: &str = "regex_enhanced";

/// One of the five target fields of a card statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Last four digits of the card number.
    #[serde(rename = "card_last_4")]
    CardLast4,
    /// Billing period covered by the statement.
    StatementPeriod,
    /// Payment due date.
    DueDate,
    /// Total amount due.
    AmountDue,
    /// Total credit limit.
    CreditLimit,
}

impl Field {
    /// All fields in resolution order.
    pub const ALL: [Field; 5] = [
        Field::CardLast4,
        Field::StatementPeriod,
        Field::DueDate,
        Field::AmountDue,
        Field::CreditLimit,
    ];

    /// Result key for this field.
    pub fn name(&self) -> &'static str {
        match self {
            Field::CardLast4 => "card_last_4",
            Field::StatementPeriod => "statement_period",
            Field::DueDate => "due_date",
            Field::AmountDue => "amount_due",
            Field::CreditLimit => "credit_limit",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evidence tier a value was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    /// Cell adjacent to a label cell in a table.
    Table,
    /// Same text block as the label.
    Block,
    /// Nearby block in the same visual column.
    BlockNear,
    /// Labeled pattern over the full text.
    Global,
    /// Last-resort pattern over the full text.
    GlobalFallback,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Table => "table",
            Origin::Block => "block",
            Origin::BlockNear => "block-near",
            Origin::Global => "global",
            Origin::GlobalFallback => "global-fallback",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Exactly four digits.
    Digits(String),
    /// Date, date range or "Immediate", in source format.
    Date(String),
    /// Amount within the field's bounds.
    Money(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Digits(s) | FieldValue::Date(s) => f.write_str(s),
            FieldValue::Money(v) => write!(f, "{v:.2}"),
        }
    }
}

/// Coarse grade of how many fields were resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Grade a count of resolved fields.
    pub fn from_count(fields_extracted: usize) -> Self {
        if fields_extracted >= 4 {
            Confidence::High
        } else if fields_extracted >= 2 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final extraction result for one statement.
///
/// The flat shape is shared with other extraction methods so callers can
/// treat them interchangeably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub card_last_4: Option<String>,
    pub card_last_4_pattern: Option<String>,
    pub statement_period: Option<String>,
    pub statement_period_pattern: Option<String>,
    pub due_date: Option<String>,
    pub due_date_pattern: Option<String>,
    pub amount_due: Option<f64>,
    pub amount_due_pattern: Option<String>,
    pub credit_limit: Option<f64>,
    pub credit_limit_pattern: Option<String>,

    /// Number of non-null fields (0-5).
    pub fields_extracted: usize,
    pub confidence: Confidence,
    pub extraction_method: String,
    /// One entry per unresolved field, in field order.
    pub alerts: Vec<String>,
    pub has_warnings: bool,
}

impl ExtractionResult {
    /// Assemble a result from per-field resolutions, in `Field::ALL` order.
    pub fn from_resolutions(resolutions: &[(Field, Option<(FieldValue, Origin)>)]) -> Self {
        let mut result = Self::empty();

        for (field, resolution) in resolutions {
            match resolution {
                Some((value, origin)) => result.set(*field, value, *origin),
                None => result.alerts.push(format!("{} not found", field)),
            }
        }

        result.fields_extracted = Field::ALL
            .iter()
            .filter(|f| result.is_resolved(**f))
            .count();
        result.confidence = Confidence::from_count(result.fields_extracted);
        result.has_warnings = !result.alerts.is_empty();
        result
    }

    fn empty() -> Self {
        Self {
            card_last_4: None,
            card_last_4_pattern: None,
            statement_period: None,
            statement_period_pattern: None,
            due_date: None,
            due_date_pattern: None,
            amount_due: None,
            amount_due_pattern: None,
            credit_limit: None,
            credit_limit_pattern: None,
            fields_extracted: 0,
            confidence: Confidence::Low,
            extraction_method: EXTRACTION_METHOD.to_string(),
            alerts: Vec::new(),
            has_warnings: false,
        }
    }

    fn set(&mut self, field: Field, value: &FieldValue, origin: Origin) {
        let text = match value {
            FieldValue::Digits(s) | FieldValue::Date(s) => Some(s.clone()),
            FieldValue::Money(_) => None,
        };
        let amount = match value {
            FieldValue::Money(v) => Some(*v),
            _ => None,
        };
        let pattern = Some(origin.as_str().to_string());

        match field {
            Field::CardLast4 => {
                self.card_last_4 = text;
                self.card_last_4_pattern = pattern;
            }
            Field::StatementPeriod => {
                self.statement_period = text;
                self.statement_period_pattern = pattern;
            }
            Field::DueDate => {
                self.due_date = text;
                self.due_date_pattern = pattern;
            }
            Field::AmountDue => {
                self.amount_due = amount;
                self.amount_due_pattern = pattern;
            }
            Field::CreditLimit => {
                self.credit_limit = amount;
                self.credit_limit_pattern = pattern;
            }
        }
    }

    /// Whether a field holds a value.
    pub fn is_resolved(&self, field: Field) -> bool {
        match field {
            Field::CardLast4 => self.card_last_4.is_some(),
            Field::StatementPeriod => self.statement_period.is_some(),
            Field::DueDate => self.due_date.is_some(),
            Field::AmountDue => self.amount_due.is_some(),
            Field::CreditLimit => self.credit_limit.is_some(),
        }
    }
}
