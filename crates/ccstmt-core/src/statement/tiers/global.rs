//! Global tier: field-specific regex cascades over the normalized text.

use regex::{Captures, Regex};
use tracing::trace;

use crate::models::config::{Bounds, ExtractionConfig};
use crate::models::document::Document;
use crate::models::statement::{Field, FieldValue, Origin};
use crate::statement::rules::patterns::{
    AMOUNT_DUE_LABELED, AMOUNT_DUE_LABELS, AMOUNT_DUE_LOOSE, CARD_LABELED, CARD_MASKED,
    CREDIT_LIMIT_LABELED, CREDIT_LIMIT_LABELS, DATE_RANGE_VERBOSE, DUE_DATE_LABELED,
    DUE_DATE_LOOSE, DUE_IMMEDIATE, FieldLabels, PERIOD_LABEL, PERIOD_RANGES,
    PERIOD_SINGLE, SUMMARY_KEYWORD, take_chars,
};
use crate::statement::rules::{
    AmountExtractor, FieldExtractor, IMMEDIATE_DUE, earliest_pair, join_range, parse_bounded,
    parse_dmy, parse_verbose,
};
use crate::statement::{FieldResolver, Resolution, Result, Tier};

/// Longest sentence span read after a summary keyword.
const SENTENCE_SPAN: usize = 200;

/// Last-resort search over the whole normalized text.
pub struct GlobalResolver {
    config: ExtractionConfig,
}

impl GlobalResolver {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Masked card numbers first, then labeled card numbers.
    fn card_last_4(&self, text: &str) -> Option<Resolution> {
        let masked = CARD_MASKED
            .iter()
            .find_map(|re| re.captures(text))
            .map(|caps| digits(&caps, Origin::Global));

        masked.or_else(|| {
            CARD_LABELED
                .iter()
                .find_map(|re| re.captures(text))
                .map(|caps| digits(&caps, Origin::GlobalFallback))
        })
    }

    /// Chronological pairing after the period label, then explicit ranges,
    /// then a single labeled date.
    fn statement_period(&self, text: &str) -> Option<Resolution> {
        if let Some(label) = PERIOD_LABEL.find(text) {
            let window = take_chars(&text[label.end()..], self.config.period_window);
            if let Some(period) = earliest_pair(window) {
                trace!("statement_period: paired dates in label window");
                return Some(Resolution::new(
                    FieldValue::Date(period),
                    Origin::Global,
                    label.as_str(),
                ));
            }
        }

        let dmy_range = PERIOD_RANGES.iter().find_map(|re| {
            re.captures_iter(text)
                .find(|caps| parse_dmy(&caps[1]).is_some() && parse_dmy(&caps[2]).is_some())
        });
        if let Some(caps) = dmy_range {
            return Some(range(&caps));
        }

        let verbose_range = DATE_RANGE_VERBOSE.captures_iter(text).find(|caps| {
            parse_verbose(&caps[1]).is_some() && parse_verbose(&caps[2]).is_some()
        });
        if let Some(caps) = verbose_range {
            return Some(range(&caps));
        }

        labeled_date(&PERIOD_SINGLE, text, Origin::GlobalFallback)
    }

    /// "Immediate" wording wins over any date.
    fn due_date(&self, text: &str) -> Option<Resolution> {
        if let Some(m) = DUE_IMMEDIATE.find(text) {
            return Some(Resolution::new(
                FieldValue::Date(IMMEDIATE_DUE.to_string()),
                Origin::Global,
                m.as_str(),
            ));
        }

        DUE_DATE_LABELED
            .iter()
            .find_map(|re| labeled_date(re, text, Origin::Global))
            .or_else(|| {
                DUE_DATE_LOOSE
                    .iter()
                    .find_map(|re| labeled_date(re, text, Origin::GlobalFallback))
            })
    }

    fn amount_due(&self, text: &str) -> Option<Resolution> {
        let bounds = self.config.amount_due_bounds;

        AMOUNT_DUE_LABELED
            .iter()
            .find_map(|re| labeled_amount(re, &AMOUNT_DUE_LABELS, text, bounds, Origin::Global))
            .or_else(|| {
                labeled_amount(
                    &AMOUNT_DUE_LOOSE,
                    &AMOUNT_DUE_LABELS,
                    text,
                    bounds,
                    Origin::GlobalFallback,
                )
            })
    }

    /// Labeled limits first; otherwise the first plausible amount in the
    /// sentence following a summary keyword.
    fn credit_limit(&self, text: &str) -> Option<Resolution> {
        let labeled = CREDIT_LIMIT_LABELED.iter().find_map(|re| {
            labeled_amount(
                re,
                &CREDIT_LIMIT_LABELS,
                text,
                self.config.credit_limit_bounds,
                Origin::Global,
            )
        });
        if labeled.is_some() {
            return labeled;
        }

        let amounts = AmountExtractor::new(self.config.credit_limit_fallback_bounds);
        SUMMARY_KEYWORD.find_iter(text).find_map(|keyword| {
            let span = sentence(&text[keyword.end()..]);
            amounts.extract(span).map(|amount| {
                Resolution::new(FieldValue::Money(amount), Origin::GlobalFallback, span)
            })
        })
    }
}

impl Default for GlobalResolver {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

impl FieldResolver for GlobalResolver {
    fn tier(&self) -> Tier {
        Tier::Global
    }

    fn attempt(&self, field: Field, document: &Document) -> Result<Option<Resolution>> {
        let text = document.normalized_text();

        Ok(match field {
            Field::CardLast4 => self.card_last_4(text),
            Field::StatementPeriod => self.statement_period(text),
            Field::DueDate => self.due_date(text),
            Field::AmountDue => self.amount_due(text),
            Field::CreditLimit => self.credit_limit(text),
        })
    }
}

fn digits(caps: &Captures<'_>, origin: Origin) -> Resolution {
    Resolution::new(FieldValue::Digits(caps[1].to_string()), origin, &caps[0])
}

fn range(caps: &Captures<'_>) -> Resolution {
    Resolution::new(
        FieldValue::Date(join_range(&caps[1], &caps[2])),
        Origin::GlobalFallback,
        &caps[0],
    )
}

fn labeled_date(re: &Regex, text: &str, origin: Origin) -> Option<Resolution> {
    re.captures_iter(text)
        .find(|caps| parse_dmy(&caps[1]).is_some() || parse_verbose(&caps[1]).is_some())
        .map(|caps| {
            Resolution::new(FieldValue::Date(caps[1].trim().to_string()), origin, &caps[0])
        })
}

/// First in-bounds number captured by `re` whose label is not qualified away.
fn labeled_amount(
    re: &Regex,
    labels: &FieldLabels,
    text: &str,
    bounds: Bounds,
    origin: Origin,
) -> Option<Resolution> {
    re.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        if labels.excluded_at(text, whole.start()) {
            return None;
        }
        parse_bounded(&caps[1], bounds)
            .map(|amount| Resolution::new(FieldValue::Money(amount), origin, whole.as_str()))
    })
}

/// Text up to the end of the sentence, at most `SENTENCE_SPAN` characters.
fn sentence(text: &str) -> &str {
    let span = take_chars(text, SENTENCE_SPAN);
    match span.find(". ") {
        Some(end) => &span[..end],
        None => span,
    }
}
