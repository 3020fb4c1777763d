//! Date and date-range extraction for card statements.

use std::borrow::Cow;

use chrono::NaiveDate;

use super::FieldExtractor;
use super::patterns::{
    DATE_DMY, DATE_RANGE_DMY, DATE_RANGE_VERBOSE, DATE_VERBOSE, DUE_IMMEDIATE, IMMEDIATE_VALUE,
};

/// Literal returned when a statement says payment is due immediately.
pub const IMMEDIATE_DUE: &str = "Immediate";

/// Date field extractor.
///
/// Values keep the statement's own formatting; ranges are joined with " to ".
pub struct DateExtractor {
    accept_immediate: bool,
    pair_loose_dates: bool,
}

impl DateExtractor {
    pub fn new() -> Self {
        Self {
            accept_immediate: false,
            pair_loose_dates: false,
        }
    }

    /// Accept "immediate" wording as a value (due dates).
    pub fn with_immediate(mut self, accept: bool) -> Self {
        self.accept_immediate = accept;
        self
    }

    /// Without an explicit range, pair the two earliest numeric dates
    /// (statement periods printed as two separate dates).
    pub fn with_loose_pairs(mut self, pair: bool) -> Self {
        self.pair_loose_dates = pair;
        self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        if self.accept_immediate && is_immediate(text) {
            return Some(IMMEDIATE_DUE.to_string());
        }

        for caps in DATE_RANGE_DMY.captures_iter(text) {
            if parse_dmy(&caps[1]).is_some() && parse_dmy(&caps[2]).is_some() {
                return Some(join_range(&caps[1], &caps[2]));
            }
        }

        for caps in DATE_RANGE_VERBOSE.captures_iter(text) {
            if parse_verbose(&caps[1]).is_some() && parse_verbose(&caps[2]).is_some() {
                return Some(join_range(&caps[1], &caps[2]));
            }
        }

        if self.pair_loose_dates {
            if let Some(period) = earliest_pair(text) {
                return Some(period);
            }
        }

        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<(usize, String)> = Vec::new();

        for m in DATE_DMY.find_iter(text) {
            if parse_dmy(m.as_str()).is_some() {
                results.push((m.start(), m.as_str().to_string()));
            }
        }

        for m in DATE_VERBOSE.captures_iter(text).filter_map(|caps| caps.get(1)) {
            if parse_verbose(m.as_str()).is_some() {
                results.push((m.start(), m.as_str().to_string()));
            }
        }

        results.sort_by_key(|(pos, _)| *pos);
        results.into_iter().map(|(_, date)| date).collect()
    }
}

/// All valid `dd/mm/yyyy` dates in the text, in order of appearance.
pub fn dmy_dates(text: &str) -> Vec<(NaiveDate, &str)> {
    DATE_DMY
        .find_iter(text)
        .filter_map(|m| parse_dmy(m.as_str()).map(|d| (d, m.as_str())))
        .collect()
}

/// The two earliest distinct numeric dates in chronological order, joined
/// as a range. Source order does not matter.
pub fn earliest_pair(text: &str) -> Option<String> {
    let mut dates = dmy_dates(text);
    dates.sort_by_key(|(date, _)| *date);
    dates.dedup_by_key(|(date, _)| *date);

    match dates.as_slice() {
        [(_, first), (_, second), ..] => Some(join_range(first, second)),
        _ => None,
    }
}

/// Parse a day-first numeric date with `/` or `-` separators.
pub fn parse_dmy(s: &str) -> Option<NaiveDate> {
    let caps = DATE_DMY.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a "Month DD, YYYY" date.
pub fn parse_verbose(s: &str) -> Option<NaiveDate> {
    let cleaned = s.replace([',', '.'], "");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    ["%B %d %Y", "%b %d %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
        .or_else(|| {
            // chrono has no "Sept"
            let fixed = cleaned.replacen("Sept ", "Sep ", 1).replacen("sept ", "sep ", 1);
            NaiveDate::parse_from_str(&fixed, "%b %d %Y").ok()
        })
}

/// "Immediate" tied to a due label, or standing alone as the value.
/// Unrelated prose ("charges apply immediately") does not count.
fn is_immediate(text: &str) -> bool {
    IMMEDIATE_VALUE.is_match(text) || DUE_IMMEDIATE.is_match(text)
}

/// Remove date tokens so their digits are not mistaken for other numbers.
pub fn strip_dates(text: &str) -> Cow<'_, str> {
    match DATE_DMY.replace_all(text, " ") {
        Cow::Borrowed(_) => DATE_VERBOSE.replace_all(text, " "),
        Cow::Owned(s) => Cow::Owned(DATE_VERBOSE.replace_all(&s, " ").into_owned()),
    }
}

/// Join two source-format dates into a period string.
pub fn join_range(start: &str, end: &str) -> String {
    format!("{} to {}", start.trim(), end.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dmy() {
        assert_eq!(parse_dmy("04/11/2021"), NaiveDate::from_ymd_opt(2021, 11, 4));
        assert_eq!(parse_dmy("4-1-2021"), NaiveDate::from_ymd_opt(2021, 1, 4));
        assert_eq!(parse_dmy("31/02/2021"), None);
        assert_eq!(parse_dmy("no date"), None);
    }

    #[test]
    fn test_parse_verbose() {
        assert_eq!(parse_verbose("October 15, 2021"), NaiveDate::from_ymd_opt(2021, 10, 15));
        assert_eq!(parse_verbose("Oct 15, 2021"), NaiveDate::from_ymd_opt(2021, 10, 15));
        assert_eq!(parse_verbose("Sept. 17, 2021"), NaiveDate::from_ymd_opt(2021, 9, 17));
        assert_eq!(parse_verbose("Feb 30, 2021"), None);
    }

    #[test]
    fn test_extract_dmy_range() {
        let extractor = DateExtractor::new();
        assert_eq!(
            extractor.extract("Statement Period 17/09/2021 - 15/10/2021"),
            Some("17/09/2021 to 15/10/2021".to_string())
        );
        assert_eq!(
            extractor.extract("17-09-2021 to 15-10-2021"),
            Some("17-09-2021 to 15-10-2021".to_string())
        );
    }

    #[test]
    fn test_extract_verbose_range() {
        let extractor = DateExtractor::new();
        assert_eq!(
            extractor.extract("Sep 17, 2021 - Oct 15, 2021"),
            Some("Sep 17, 2021 to Oct 15, 2021".to_string())
        );
    }

    #[test]
    fn test_extract_single_date() {
        let extractor = DateExtractor::new();
        assert_eq!(extractor.extract("Due 04/11/2021"), Some("04/11/2021".to_string()));
        assert_eq!(
            extractor.extract("Due by November 4, 2021"),
            Some("November 4, 2021".to_string())
        );
        assert_eq!(extractor.extract("Due 31/02/2021"), None);
    }

    #[test]
    fn test_immediate_only_when_enabled() {
        let text = "Payment Due Date: Immediate 04/11/2021";
        assert_eq!(
            DateExtractor::new().with_immediate(true).extract(text),
            Some(IMMEDIATE_DUE.to_string())
        );
        assert_eq!(
            DateExtractor::new().extract(text),
            Some("04/11/2021".to_string())
        );
    }

    #[test]
    fn test_immediate_needs_label_or_whole_value() {
        let due = DateExtractor::new().with_immediate(true);

        assert_eq!(due.extract("Immediate"), Some(IMMEDIATE_DUE.to_string()));
        assert_eq!(due.extract(": Payable immediately"), Some(IMMEDIATE_DUE.to_string()));
        assert_eq!(
            due.extract("Payment Due Date 04/11/2021. Late charges apply immediately after"),
            Some("04/11/2021".to_string())
        );
        assert_eq!(due.extract("Effective immediately"), None);
    }

    #[test]
    fn test_loose_dates_paired_chronologically() {
        let text = "Statement Period 15/10/2021 17/09/2021";
        assert_eq!(
            DateExtractor::new().with_loose_pairs(true).extract(text),
            Some("17/09/2021 to 15/10/2021".to_string())
        );
        assert_eq!(DateExtractor::new().extract(text), Some("15/10/2021".to_string()));
    }

    #[test]
    fn test_earliest_pair() {
        assert_eq!(
            earliest_pair("Due 04/11/2021 from 15/10/2021 17/09/2021 15/10/2021"),
            Some("17/09/2021 to 15/10/2021".to_string())
        );
        assert_eq!(earliest_pair("04/11/2021 and 04/11/2021"), None);
        assert_eq!(earliest_pair("31/02/2021 04/11/2021"), None);
    }

    #[test]
    fn test_extract_all_in_source_order() {
        let extractor = DateExtractor::new();
        let dates = extractor.extract_all("Oct 15, 2021 then 04/11/2021");
        assert_eq!(dates, vec!["Oct 15, 2021", "04/11/2021"]);
    }

    #[test]
    fn test_strip_dates() {
        assert_eq!(strip_dates("Due 04/11/2021 amt 500").trim(), "Due   amt 500");
        assert_eq!(strip_dates("no dates here"), "no dates here");
    }
}
