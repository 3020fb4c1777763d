//! Block tier: positioned text blocks inside the statement's summary zone.

use std::ops::Range;

use tracing::{debug, trace, warn};

use crate::models::config::ExtractionConfig;
use crate::models::document::{Document, TextBlock};
use crate::models::statement::{Field, Origin};
use crate::statement::rules::ValueKind;
use crate::statement::rules::patterns::{NOISE, SUMMARY_HEADER, TRANSACTION_ANCHOR, field_labels};
use crate::statement::{Candidate, FieldResolver, Resolution, Result, Tier};

/// Sub-range of reading-order blocks expected to hold the key/value summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryZone {
    /// First block searched.
    pub start: usize,
    /// Nominal end: the transaction anchor, or the block count.
    pub end: usize,
    /// Index of the summary header block.
    pub header: Option<usize>,
    /// Index of the transaction anchor block.
    pub anchor: Option<usize>,
}

impl SummaryZone {
    /// Locate the zone in reading-order blocks.
    ///
    /// Without a header the zone starts at the first block. The anchor is
    /// looked for at or after the header.
    pub fn locate(blocks: &[&TextBlock], config: &ExtractionConfig) -> Self {
        let header = blocks.iter().position(|b| SUMMARY_HEADER.is_match(&b.text));
        let from = header.unwrap_or(0);
        let anchor = blocks[from..]
            .iter()
            .position(|b| TRANSACTION_ANCHOR.is_match(&b.text))
            .map(|i| i + from);

        Self {
            start: header.map_or(0, |h| h.saturating_sub(config.summary_lookback)),
            end: anchor.unwrap_or(blocks.len()),
            header,
            anchor,
        }
    }

    /// Blocks actually searched: the zone plus the overrun past its end,
    /// clamped to `len`.
    pub fn range(&self, len: usize, overrun: usize) -> Range<usize> {
        let end = self.end.saturating_add(overrun).min(len);
        self.start.min(end)..end
    }
}

/// Blocks sorted by (page, top, left).
///
/// A block whose box has a non-finite coordinate cannot be placed and is
/// left out.
pub fn reading_order(blocks: &[TextBlock]) -> Vec<&TextBlock> {
    let mut ordered: Vec<&TextBlock> = blocks.iter().filter(|b| b.bbox.is_finite()).collect();
    ordered.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then_with(|| a.bbox.y0.total_cmp(&b.bbox.y0))
            .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
    });
    ordered
}

/// Reads a value from the label block itself or from a block below it in
/// the same visual column.
pub struct BlockResolver {
    config: ExtractionConfig,
}

impl BlockResolver {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    fn same_column(&self, label: &TextBlock, other: &TextBlock) -> bool {
        (other.bbox.x0 - label.bbox.x0).abs() <= self.config.column_tolerance
    }
}

impl Default for BlockResolver {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

impl FieldResolver for BlockResolver {
    fn tier(&self) -> Tier {
        Tier::Block
    }

    fn attempt(&self, field: Field, document: &Document) -> Result<Option<Resolution>> {
        let ordered = reading_order(document.blocks());
        let skipped = document.blocks().len() - ordered.len();
        if skipped > 0 {
            warn!("{}: skipped {} blocks without a finite bounding box", field, skipped);
        }
        if ordered.is_empty() {
            return Ok(None);
        }

        let zone = SummaryZone::locate(&ordered, &self.config);
        let range = zone.range(ordered.len(), self.config.anchor_overrun);
        debug!(
            "{}: summary zone {:?} (header {:?}, anchor {:?})",
            field, range, zone.header, zone.anchor
        );

        let labels = field_labels(field);
        let kind = ValueKind::for_field(field, &self.config);

        for i in range {
            let block = ordered[i];
            if NOISE.is_match(&block.text) {
                continue;
            }

            let Some(at) = labels.find(&block.text) else {
                continue;
            };

            trace!("{}: label block {} {:?}", field, i, block.text);

            let same_block = Candidate::new(&block.text[at..], Origin::Block)
                .validate(&kind)
                .or_else(|| Candidate::new(&block.text, Origin::Block).validate(&kind));
            if same_block.is_some() {
                return Ok(same_block);
            }

            let near = ordered
                .iter()
                .skip(i + 1)
                .take(self.config.block_lookahead)
                .filter(|next| !NOISE.is_match(&next.text))
                .filter(|next| self.same_column(block, next))
                .find_map(|next| Candidate::new(&next.text, Origin::BlockNear).validate(&kind));
            if near.is_some() {
                return Ok(near);
            }
        }

        Ok(None)
    }
}
