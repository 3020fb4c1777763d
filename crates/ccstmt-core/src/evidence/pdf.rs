//! Text-layer PDFs read with lopdf and pdf-extract.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use lopdf::Document as PdfDocument;
use tracing::debug;

use crate::error::EvidenceError;
use crate::models::config::PdfConfig;
use crate::models::document::RawEvidence;

use super::text::line_blocks;
use super::{EvidenceSource, Result};

/// A PDF statement with an embedded text layer.
///
/// No table structure is recovered: the evidence is the flattened text plus
/// one block per line. Scanned statements (too little text) are rejected.
pub struct PdfTextEvidence {
    data: Vec<u8>,
    config: PdfConfig,
}

impl PdfTextEvidence {
    /// Read a PDF from disk.
    pub fn open(path: &Path, config: PdfConfig) -> Result<Self> {
        let data = fs::read(path)?;
        debug!("Read {} bytes from {}", data.len(), path.display());
        Ok(Self::from_bytes(data, config))
    }

    pub fn from_bytes(data: Vec<u8>, config: PdfConfig) -> Self {
        Self { data, config }
    }

    /// Bytes pdf-extract can read: the original, or a re-saved copy when
    /// the file only had an empty user password.
    fn readable_bytes(&self) -> Result<Cow<'_, [u8]>> {
        let mut doc =
            PdfDocument::load_mem(&self.data).map_err(|e| EvidenceError::Parse(e.to_string()))?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(EvidenceError::NoPages);
        }
        debug!("Loaded PDF with {} pages", page_count);

        if !doc.is_encrypted() {
            return Ok(Cow::Borrowed(self.data.as_slice()));
        }

        if doc.decrypt("").is_err() {
            return Err(EvidenceError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");

        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted)
            .map_err(|e| EvidenceError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
        Ok(Cow::Owned(decrypted))
    }
}

impl EvidenceSource for PdfTextEvidence {
    fn read_evidence(&self) -> Result<RawEvidence> {
        let bytes = self.readable_bytes()?;
        let raw_text = pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| EvidenceError::TextExtraction(e.to_string()))?;

        let length = raw_text.trim().chars().count();
        if length < self.config.min_text_length {
            return Err(EvidenceError::TextExtraction(format!(
                "only {} characters of text (scanned statement?)",
                length
            )));
        }

        let blocks = line_blocks(&raw_text, self.config.line_height);
        debug!("Extracted {} characters, {} line blocks", raw_text.len(), blocks.len());

        Ok(RawEvidence {
            tables: Vec::new(),
            blocks,
            raw_text,
        })
    }
}
