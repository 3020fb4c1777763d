//! Evidence sources: where tables, blocks and raw text come from.
//!
//! The parser never reads files itself; it is handed a [`Document`] built by
//! one of these sources.

mod bundle;
#[cfg(feature = "pdf")]
mod pdf;
mod text;

pub use bundle::{EvidenceBundle, parse_bundle};
#[cfg(feature = "pdf")]
pub use pdf::PdfTextEvidence;
pub use text::{PlainTextEvidence, line_blocks};

use std::path::Path;

use crate::error::EvidenceError;
use crate::models::config::PdfConfig;
use crate::models::document::{Document, RawEvidence};

/// Result type for evidence loading.
pub type Result<T> = std::result::Result<T, EvidenceError>;

/// Supplier of raw document evidence.
pub trait EvidenceSource {
    /// Read tables, blocks and text. Failure here is fatal for the document.
    fn read_evidence(&self) -> Result<RawEvidence>;

    /// Read evidence and build the immutable document.
    fn load_document(&self) -> Result<Document> {
        self.read_evidence().map(Document::new)
    }
}

/// In-memory evidence.
impl EvidenceSource for RawEvidence {
    fn read_evidence(&self) -> Result<RawEvidence> {
        Ok(self.clone())
    }
}

/// Input formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// JSON evidence bundle (`tables`, `blocks`, `raw_text`).
    Bundle,
    /// Text-layer PDF.
    Pdf,
    /// Plain text, one block per line.
    Text,
}

impl InputFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(InputFormat::Bundle),
            "pdf" => Ok(InputFormat::Pdf),
            "txt" => Ok(InputFormat::Text),
            _ => Err(EvidenceError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Open an evidence source for a file, chosen by extension.
pub fn open(path: &Path, config: &PdfConfig) -> Result<Box<dyn EvidenceSource>> {
    match InputFormat::from_path(path)? {
        InputFormat::Bundle => Ok(Box::new(EvidenceBundle::new(path))),
        InputFormat::Text => Ok(Box::new(PlainTextEvidence::new(path, config.line_height))),
        #[cfg(feature = "pdf")]
        InputFormat::Pdf => Ok(Box::new(PdfTextEvidence::open(path, config.clone())?)),
        #[cfg(not(feature = "pdf"))]
        InputFormat::Pdf => Err(EvidenceError::UnsupportedFormat(format!(
            "{} (built without PDF support)",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            InputFormat::from_path(&PathBuf::from("a/statement.JSON")).unwrap(),
            InputFormat::Bundle
        );
        assert_eq!(
            InputFormat::from_path(&PathBuf::from("statement.pdf")).unwrap(),
            InputFormat::Pdf
        );
        assert!(matches!(
            InputFormat::from_path(&PathBuf::from("statement.docx")),
            Err(EvidenceError::UnsupportedFormat(_))
        ));
        assert!(InputFormat::from_path(&PathBuf::from("statement")).is_err());
    }

    #[test]
    fn test_raw_evidence_is_a_source() {
        let evidence = RawEvidence {
            raw_text: "Total Amount Due   ₹78,708.38".into(),
            ..RawEvidence::default()
        };
        let doc = evidence.load_document().unwrap();
        assert_eq!(doc.normalized_text(), "Total Amount Due ₹ 78,708.38");
    }
}
