//! Statement field extraction module.

mod parser;
pub mod rules;
pub mod tiers;
pub mod trace;

pub use parser::{Extraction, StatementParser};
pub use tiers::{BlockResolver, GlobalResolver, SummaryZone, TableResolver};
pub use trace::{Trace, TraceEntry, TraceOutcome};

use std::fmt;

use serde::Serialize;

use crate::error::ExtractionError;
use crate::models::document::Document;
use crate::models::statement::{Field, FieldValue, Origin};
use rules::ValueKind;

/// Result type for field resolution.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Evidence tier, tried in this order for every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Table,
    Block,
    Global,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Table => "table",
            Tier::Block => "block",
            Tier::Global => "global",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw string considered as a possible field value.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub raw: &'a str,
    pub origin: Origin,
}

impl<'a> Candidate<'a> {
    pub fn new(raw: &'a str, origin: Origin) -> Self {
        Self { raw, origin }
    }

    /// Validate the candidate against a value kind.
    pub fn validate(&self, kind: &ValueKind) -> Option<Resolution> {
        kind.extract(self.raw)
            .map(|value| Resolution::new(value, self.origin, self.raw))
    }
}

/// A validated value and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub value: FieldValue,
    pub origin: Origin,
    /// Evidence text the value was read from.
    pub source: String,
}

impl Resolution {
    pub fn new(value: FieldValue, origin: Origin, source: impl Into<String>) -> Self {
        Self {
            value,
            origin,
            source: source.into(),
        }
    }
}

/// One evidence tier of the field-resolution pipeline.
pub trait FieldResolver: Send + Sync {
    /// Tier this resolver implements.
    fn tier(&self) -> Tier;

    /// Try to resolve a field from the document.
    ///
    /// `Ok(None)` means no candidate validated; `Err` means the tier could
    /// not be evaluated for this field.
    fn attempt(&self, field: Field, document: &Document) -> Result<Option<Resolution>>;
}

/// Trait for statement extractors.
pub trait StatementExtractor {
    /// Extract the five statement fields from document evidence.
    fn extract(&self, document: &Document) -> Extraction;

    /// Extract from flattened text alone.
    fn extract_from_text(&self, text: &str) -> Extraction {
        self.extract(&Document::from_text(text))
    }
}
