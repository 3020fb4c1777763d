//! Table tier: label cells and their neighbouring cells.

use tracing::trace;

use crate::models::config::ExtractionConfig;
use crate::models::document::{Document, Table};
use crate::models::statement::{Field, Origin};
use crate::statement::rules::ValueKind;
use crate::statement::rules::patterns::field_labels;
use crate::statement::{Candidate, FieldResolver, Resolution, Result, Tier};

/// Reads values next to (right of) or under a field's label cell.
pub struct TableResolver {
    config: ExtractionConfig,
}

impl TableResolver {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }
}

impl Default for TableResolver {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

impl FieldResolver for TableResolver {
    fn tier(&self) -> Tier {
        Tier::Table
    }

    fn attempt(&self, field: Field, document: &Document) -> Result<Option<Resolution>> {
        let labels = field_labels(field);
        let kind = ValueKind::for_field(field, &self.config);

        for (t, table) in document.tables().iter().enumerate() {
            for (r, row) in table.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    if !labels.matches(cell) {
                        continue;
                    }

                    trace!("{}: label cell {:?} at table {} ({}, {})", field, cell, t, r, c);

                    let found = adjacent_cells(table, r, c)
                        .take(self.config.table_candidate_limit)
                        .find_map(|raw| Candidate::new(raw, Origin::Table).validate(&kind));

                    if found.is_some() {
                        return Ok(found);
                    }
                }
            }
        }

        Ok(None)
    }
}

/// Non-empty cells right of `(row, col)`, then the same column in later rows.
fn adjacent_cells(table: &Table, row: usize, col: usize) -> impl Iterator<Item = &str> {
    let right = table[row].iter().skip(col + 1);
    let below = table.iter().skip(row + 1).filter_map(move |r| r.get(col));

    right
        .chain(below)
        .map(|cell| cell.as_str())
        .filter(|cell| !cell.trim().is_empty())
}
