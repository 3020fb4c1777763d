//! Flat text as evidence: every non-empty line becomes a positioned block.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::document::{RawEvidence, TextBlock};

use super::{EvidenceSource, Result};

/// Approximate advance of one character, in layout units.
const CHAR_WIDTH: f64 = 6.0;

/// Page separator emitted by text extractors.
const FORM_FEED: char = '\u{c}';

/// Plain-text statement dump.
#[derive(Debug, Clone)]
pub struct PlainTextEvidence {
    path: PathBuf,
    line_height: f64,
}

impl PlainTextEvidence {
    pub fn new(path: impl AsRef<Path>, line_height: f64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            line_height,
        }
    }
}

impl EvidenceSource for PlainTextEvidence {
    fn read_evidence(&self) -> Result<RawEvidence> {
        let raw_text = fs::read_to_string(&self.path)?;
        Ok(RawEvidence {
            tables: Vec::new(),
            blocks: line_blocks(&raw_text, self.line_height),
            raw_text,
        })
    }
}

/// Turn text lines into blocks with synthetic boxes.
///
/// Pages are split on form feeds. `y0` is the line index times
/// `line_height`; `x0` follows the line's indentation, so columns that the
/// extractor laid out with spaces stay aligned.
pub fn line_blocks(text: &str, line_height: f64) -> Vec<TextBlock> {
    let mut blocks = Vec::new();

    for (page, page_text) in text.split(FORM_FEED).enumerate() {
        for (line_no, line) in page_text.lines().enumerate() {
            let content = line.trim();
            if content.is_empty() {
                continue;
            }

            let indent = line.chars().take_while(|c| c.is_whitespace()).count();
            let x0 = indent as f64 * CHAR_WIDTH;
            let y0 = line_no as f64 * line_height;
            let x1 = x0 + content.chars().count() as f64 * CHAR_WIDTH;

            blocks.push(TextBlock::new(
                content,
                [x0, y0, x1, y0 + line_height],
                page as u32,
            ));
        }
    }

    blocks
}
