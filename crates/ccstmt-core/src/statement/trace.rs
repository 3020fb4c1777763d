//! Resolution trace returned alongside each extraction.

use serde::Serialize;

use crate::models::statement::{Field, FieldValue, Origin};

use super::Tier;

/// What a tier produced for a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TraceOutcome {
    /// A value validated; later tiers were skipped.
    Resolved {
        value: FieldValue,
        origin: Origin,
        source: String,
    },
    /// No candidate validated.
    Miss,
    /// The tier raised an error; the field was abandoned.
    Failed { error: String },
}

/// One tier attempt for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub field: Field,
    pub tier: Tier,
    #[serde(flatten)]
    pub outcome: TraceOutcome,
}

/// Ordered record of every tier attempt in one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, tier: Tier, outcome: TraceOutcome) {
        self.entries.push(TraceEntry {
            field,
            tier,
            outcome,
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Attempts made for one field, in order.
    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter().filter(move |e| e.field == field)
    }

    /// Tiers that raised errors.
    pub fn failures(&self) -> impl Iterator<Item = &TraceEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, TraceOutcome::Failed { .. }))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_serializes_flat_entries() {
        let mut trace = Trace::new();
        trace.push(Field::DueDate, Tier::Table, TraceOutcome::Miss);
        trace.push(
            Field::DueDate,
            Tier::Block,
            TraceOutcome::Resolved {
                value: FieldValue::Date("04/11/2021".into()),
                origin: Origin::BlockNear,
                source: "04/11/2021".into(),
            },
        );

        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"field": "due_date", "tier": "table", "outcome": "miss"},
                {
                    "field": "due_date",
                    "tier": "block",
                    "outcome": "resolved",
                    "value": "04/11/2021",
                    "origin": "block-near",
                    "source": "04/11/2021"
                }
            ])
        );
    }

    #[test]
    fn test_failures_filter() {
        let mut trace = Trace::new();
        trace.push(Field::CardLast4, Tier::Table, TraceOutcome::Miss);
        trace.push(
            Field::CardLast4,
            Tier::Block,
            TraceOutcome::Failed {
                error: "bad bbox".into(),
            },
        );

        assert_eq!(trace.failures().count(), 1);
        assert_eq!(trace.for_field(Field::CardLast4).count(), 2);
        assert_eq!(trace.for_field(Field::DueDate).count(), 0);
    }
}
