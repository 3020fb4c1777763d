//! Error types for the ccstmt-core library.

use thiserror::Error;

/// Main error type for the ccstmt library.
#[derive(Error, Debug)]
pub enum StatementError {
    /// The statement evidence could not be read.
    #[error("evidence error: {0}")]
    Evidence(#[from] EvidenceError),

    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while reading document evidence (tables, blocks, text).
///
/// These are fatal for a document: no partial result is produced.
#[derive(Error, Debug)]
pub enum EvidenceError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The evidence bundle is not valid JSON or has the wrong shape.
    #[error("malformed evidence bundle: {0}")]
    Malformed(String),

    /// The input format is not recognized.
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// I/O error while reading the input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while resolving a single field.
///
/// The orchestrator recovers from these: the field is left empty and the
/// failure is recorded in the trace.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// Evidence the resolver cannot interpret.
    #[error("malformed evidence: {0}")]
    Malformed(String),
}

/// Result type for the ccstmt library.
pub type Result<T> = std::result::Result<T, StatementError>;
