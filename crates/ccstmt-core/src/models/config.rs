//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::StatementError;

/// Main configuration for ccstmt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CcstmtConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Artifact output configuration.
    pub output: OutputConfig,
}

/// Open numeric window: a value is accepted when `min < value < max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check if a value lies strictly inside the window.
    pub fn contains(&self, value: f64) -> bool {
        value > self.min && value < self.max
    }
}

/// Field extraction configuration.
///
/// The layout thresholds are empirically tuned for the statements seen so
/// far; they are exposed here rather than hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Candidates tested per table label match.
    pub table_candidate_limit: usize,

    /// Blocks included before the summary header.
    pub summary_lookback: usize,

    /// Blocks searched past the transaction anchor.
    pub anchor_overrun: usize,

    /// Blocks inspected after a label block.
    pub block_lookahead: usize,

    /// Maximum horizontal offset (layout units) for a value block to count
    /// as the label's column.
    pub column_tolerance: f64,

    /// Characters scanned after a statement-period label.
    pub period_window: usize,

    /// Plausible total amount due.
    pub amount_due_bounds: Bounds,

    /// Plausible labeled credit limit.
    pub credit_limit_bounds: Bounds,

    /// Plausible credit limit taken from a summary sentence.
    pub credit_limit_fallback_bounds: Bounds,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            table_candidate_limit: 3,
            summary_lookback: 5,
            anchor_overrun: 10,
            block_lookahead: 5,
            column_tolerance: 100.0,
            period_window: 1000,
            amount_due_bounds: Bounds::new(50.0, 1_000_000.0),
            credit_limit_bounds: Bounds::new(1_000.0, 5_000_000.0),
            credit_limit_fallback_bounds: Bounds::new(5_000.0, 1_000_000.0),
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length to consider a PDF readable.
    pub min_text_length: usize,

    /// Height of one synthetic line block for text-only PDFs.
    pub line_height: f64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            line_height: 12.0,
        }
    }
}

/// Artifact output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for extraction artifacts.
    pub artifact_dir: PathBuf,

    /// Write raw text, tables and blocks next to the result.
    pub save_intermediates: bool,

    /// Write the resolution trace next to the result.
    pub save_trace: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("outputs"),
            save_intermediates: true,
            save_trace: true,
        }
    }
}

impl CcstmtConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Reject settings the resolvers cannot work with.
    pub fn validate(&self) -> crate::Result<()> {
        let e = &self.extraction;
        let windows = [
            ("amount_due_bounds", e.amount_due_bounds),
            ("credit_limit_bounds", e.credit_limit_bounds),
            ("credit_limit_fallback_bounds", e.credit_limit_fallback_bounds),
        ];
        for (name, bounds) in windows {
            if !(bounds.min < bounds.max) {
                return Err(StatementError::Config(format!(
                    "extraction.{} must have min < max (got {} .. {})",
                    name, bounds.min, bounds.max
                )));
            }
        }

        if !e.column_tolerance.is_finite() || e.column_tolerance < 0.0 {
            return Err(StatementError::Config(
                "extraction.column_tolerance must be a non-negative number".to_string(),
            ));
        }
        if e.table_candidate_limit == 0 {
            return Err(StatementError::Config(
                "extraction.table_candidate_limit must be at least 1".to_string(),
            ));
        }
        if !(self.pdf.line_height > 0.0) {
            return Err(StatementError::Config(
                "pdf.line_height must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_exclusive() {
        let bounds = Bounds::new(50.0, 1_000_000.0);
        assert!(!bounds.contains(50.0));
        assert!(bounds.contains(50.01));
        assert!(!bounds.contains(1_000_000.0));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CcstmtConfig =
            serde_json::from_str(r#"{"extraction": {"column_tolerance": 80.0}}"#).unwrap();
        assert_eq!(config.extraction.column_tolerance, 80.0);
        assert_eq!(config.extraction.anchor_overrun, 10);
        assert_eq!(config.pdf.min_text_length, 50);
    }

    #[test]
    fn test_validate() {
        assert!(CcstmtConfig::default().validate().is_ok());

        let mut config = CcstmtConfig::default();
        config.extraction.credit_limit_bounds = Bounds::new(5_000_000.0, 1_000.0);
        assert!(matches!(config.validate(), Err(StatementError::Config(_))));

        let mut config = CcstmtConfig::default();
        config.pdf.line_height = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = CcstmtConfig::default();
        config.extraction.block_lookahead = 7;
        config.save(&path).unwrap();

        let loaded = CcstmtConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.block_lookahead, 7);
    }
}
