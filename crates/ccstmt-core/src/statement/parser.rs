//! Tiered statement parser: every field walks the resolver list in order.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::evidence::EvidenceSource;
use crate::models::config::ExtractionConfig;
use crate::models::document::Document;
use crate::models::statement::{ExtractionResult, Field, FieldValue, Origin};

use super::trace::{Trace, TraceOutcome};
use super::{BlockResolver, FieldResolver, GlobalResolver, StatementExtractor, TableResolver};

/// Result of one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    /// Final field values and confidence.
    pub result: ExtractionResult,
    /// Every tier attempt, in order.
    pub trace: Trace,
}

/// Rule-based statement parser.
///
/// Holds no per-run state; one parser can extract any number of documents,
/// from any number of threads.
pub struct StatementParser {
    config: ExtractionConfig,
    resolvers: Vec<Box<dyn FieldResolver>>,
}

impl StatementParser {
    /// Create a parser with default thresholds and the standard tiers.
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    /// Create a parser with the standard tiers (table, block, global).
    pub fn with_config(config: ExtractionConfig) -> Self {
        let resolvers: Vec<Box<dyn FieldResolver>> = vec![
            Box::new(TableResolver::new(config.clone())),
            Box::new(BlockResolver::new(config.clone())),
            Box::new(GlobalResolver::new(config.clone())),
        ];
        Self { config, resolvers }
    }

    /// Replace the resolver list. Resolvers run in the given order.
    pub fn with_resolvers(mut self, resolvers: Vec<Box<dyn FieldResolver>>) -> Self {
        self.resolvers = resolvers;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Read evidence from a source and extract it.
    ///
    /// Unreadable evidence is the only error; once a document exists a
    /// result is always produced.
    pub fn extract_from(&self, source: &dyn EvidenceSource) -> crate::Result<(Document, Extraction)> {
        let document = source.load_document()?;
        let extraction = self.extract(&document);
        Ok((document, extraction))
    }

    /// Walk the tiers for one field, stopping at the first validated value.
    ///
    /// A tier error abandons the field: it is logged, recorded in the trace
    /// and the field stays empty.
    fn resolve_field(
        &self,
        field: Field,
        document: &Document,
        trace: &mut Trace,
    ) -> Option<(FieldValue, Origin)> {
        for resolver in &self.resolvers {
            let tier = resolver.tier();

            match resolver.attempt(field, document) {
                Ok(Some(resolution)) => {
                    debug!(
                        "{} resolved by {} tier ({}): {}",
                        field, tier, resolution.origin, resolution.value
                    );
                    trace.push(
                        field,
                        tier,
                        TraceOutcome::Resolved {
                            value: resolution.value.clone(),
                            origin: resolution.origin,
                            source: resolution.source,
                        },
                    );
                    return Some((resolution.value, resolution.origin));
                }
                Ok(None) => {
                    trace!("{} not found by {} tier", field, tier);
                    trace.push(field, tier, TraceOutcome::Miss);
                }
                Err(e) => {
                    warn!("{} tier failed for {}: {}", tier, field, e);
                    trace.push(
                        field,
                        tier,
                        TraceOutcome::Failed {
                            error: e.to_string(),
                        },
                    );
                    return None;
                }
            }
        }

        None
    }
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementExtractor for StatementParser {
    fn extract(&self, document: &Document) -> Extraction {
        let start = Instant::now();
        info!(
            "Extracting statement fields from {} tables, {} blocks, {} characters of text",
            document.tables().len(),
            document.blocks().len(),
            document.normalized_text().len()
        );

        let mut trace = Trace::new();
        let resolutions: Vec<(Field, Option<(FieldValue, Origin)>)> = Field::ALL
            .iter()
            .map(|&field| (field, self.resolve_field(field, document, &mut trace)))
            .collect();

        let result = ExtractionResult::from_resolutions(&resolutions);

        info!(
            "Extracted {}/{} fields, confidence {}",
            result.fields_extracted,
            Field::ALL.len(),
            result.confidence
        );
        debug!("Extraction took {} ms", start.elapsed().as_millis());

        Extraction { result, trace }
    }
}
