//! Document evidence: tables, positioned text blocks and flattened text.

use serde::{Deserialize, Serialize};

use crate::statement::rules::normalize::normalize;

/// A table as rows of cell strings.
pub type Table = Vec<Vec<String>>;

/// Axis-aligned bounding box in layout units, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BoundingBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Whether every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(b: [f64; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

/// A positioned chunk of text, roughly one visual paragraph or line group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Text content.
    pub text: String,
    /// Bounding box (x0, y0, x1, y1).
    pub bbox: BoundingBox,
    /// Page index (0-based).
    #[serde(default)]
    pub page: u32,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, bbox: impl Into<BoundingBox>, page: u32) -> Self {
        Self {
            text: text.into(),
            bbox: bbox.into(),
            page,
        }
    }
}

/// Evidence as produced by a table/block extraction adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEvidence {
    /// Extracted tables in document order.
    pub tables: Vec<Table>,
    /// Positioned text blocks.
    pub blocks: Vec<TextBlock>,
    /// Concatenated page text.
    pub raw_text: String,
}

/// Immutable evidence bundle for one statement.
///
/// The raw text is normalized once at construction; nothing is mutated
/// afterwards, so a document can be shared freely across resolvers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    tables: Vec<Table>,
    blocks: Vec<TextBlock>,
    raw_text: String,
    normalized_text: String,
}

impl Document {
    /// Build a document from adapter evidence.
    pub fn new(evidence: RawEvidence) -> Self {
        let normalized_text = normalize(&evidence.raw_text);
        Self {
            tables: evidence.tables,
            blocks: evidence.blocks,
            raw_text: evidence.raw_text,
            normalized_text,
        }
    }

    /// Build a text-only document with no tables or blocks.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(RawEvidence {
            raw_text: text.into(),
            ..RawEvidence::default()
        })
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn normalized_text(&self) -> &str {
        &self.normalized_text
    }
}

impl From<RawEvidence> for Document {
    fn from(evidence: RawEvidence) -> Self {
        Self::new(evidence)
    }
}
