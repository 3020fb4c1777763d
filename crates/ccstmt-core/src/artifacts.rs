//! Writes extraction results and the evidence behind them to disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::Result;
use crate::models::config::OutputConfig;
use crate::models::document::Document;
use crate::statement::Extraction;

/// Persists one extraction run as a set of files sharing a stem.
///
/// `<stem>_result.json` is always written; raw text, tables, blocks and the
/// trace are optional.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
    save_intermediates: bool,
    save_trace: bool,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            save_intermediates: true,
            save_trace: true,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.artifact_dir.clone())
            .with_intermediates(config.save_intermediates)
            .with_trace(config.save_trace)
    }

    /// Write into another directory, keeping the other settings.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_intermediates(mut self, save: bool) -> Self {
        self.save_intermediates = save;
        self
    }

    pub fn with_trace(mut self, save: bool) -> Self {
        self.save_trace = save;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write all artifacts for one document. Returns the written paths.
    pub fn write(
        &self,
        stem: &str,
        document: &Document,
        extraction: &Extraction,
    ) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;
        let mut written = Vec::new();

        written.push(self.write_json(stem, "result.json", &extraction.result)?);

        if self.save_intermediates {
            let path = self.path(stem, "raw_text.txt");
            fs::write(&path, document.raw_text())?;
            written.push(path);

            written.push(self.write_json(stem, "tables.json", document.tables())?);
            written.push(self.write_json(stem, "blocks.json", document.blocks())?);
        }

        if self.save_trace {
            written.push(self.write_json(stem, "trace.json", &extraction.trace)?);
        }

        debug!("Wrote {} artifacts to {}", written.len(), self.dir.display());
        Ok(written)
    }

    fn path(&self, stem: &str, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}_{}", stem, suffix))
    }

    fn write_json<T>(&self, stem: &str, suffix: &str, value: &T) -> Result<PathBuf>
    where
        T: Serialize + ?Sized,
    {
        let path = self.path(stem, suffix);
        fs::write(&path, serde_json::to_string_pretty(value)?)?;
        Ok(path)
    }
}
