//! JSON evidence bundles written by an external table/block extractor.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::EvidenceError;
use crate::models::document::RawEvidence;

use super::{EvidenceSource, Result};

/// Evidence stored as `{"tables": [...], "blocks": [...], "raw_text": "..."}`.
#[derive(Debug, Clone)]
pub struct EvidenceBundle {
    path: PathBuf,
}

impl EvidenceBundle {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EvidenceSource for EvidenceBundle {
    fn read_evidence(&self) -> Result<RawEvidence> {
        let data = fs::read_to_string(&self.path)?;
        let evidence = parse_bundle(&data)?;
        debug!(
            "Loaded bundle {}: {} tables, {} blocks, {} characters",
            self.path.display(),
            evidence.tables.len(),
            evidence.blocks.len(),
            evidence.raw_text.len()
        );
        Ok(evidence)
    }
}

/// Parse bundle JSON. Missing sections default to empty.
pub fn parse_bundle(json: &str) -> Result<RawEvidence> {
    serde_json::from_str(json).map_err(|e| EvidenceError::Malformed(e.to_string()))
}
