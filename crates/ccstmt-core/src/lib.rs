//! Core library for credit-card statement field extraction.
//!
//! This crate provides:
//! - Evidence loading (JSON bundles, plain text, text-layer PDFs)
//! - Tiered field resolution: tables, then positioned blocks, then the full text
//! - Value extraction for card digits, dates and bounded amounts
//! - Confidence scoring and a resolution trace per run
//! - Artifact persistence for results and intermediate evidence

pub mod artifacts;
pub mod error;
pub mod evidence;
pub mod models;
pub mod statement;

pub use artifacts::ArtifactWriter;
pub use error::{EvidenceError, ExtractionError, Result, StatementError};
pub use evidence::{EvidenceSource, InputFormat};
pub use models::config::{Bounds, CcstmtConfig, ExtractionConfig};
pub use models::document::{BoundingBox, Document, RawEvidence, Table, TextBlock};
pub use models::statement::{Confidence, ExtractionResult, Field, FieldValue, Origin};
pub use statement::{Extraction, FieldResolver, StatementExtractor, StatementParser, Tier, Trace};
