//! Output formatting shared by `extract` and `batch`.

use ccstmt_core::statement::rules::format_inr;
use ccstmt_core::statement::{Trace, TraceOutcome};
use ccstmt_core::{ExtractionResult, Field};

/// Output format for extraction results.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Shown in place of an unresolved field.
const NOT_FOUND: &str = "Not Found";

/// Column names for one result row.
pub const RESULT_COLUMNS: [&str; 9] = [
    "card_last_4",
    "statement_period",
    "due_date",
    "amount_due",
    "credit_limit",
    "fields_extracted",
    "confidence",
    "extraction_method",
    "alerts",
];

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

/// One CSV row, aligned with [`RESULT_COLUMNS`].
pub fn result_record(result: &ExtractionResult) -> Vec<String> {
    vec![
        result.card_last_4.clone().unwrap_or_default(),
        result.statement_period.clone().unwrap_or_default(),
        result.due_date.clone().unwrap_or_default(),
        result.amount_due.map(|v| format!("{:.2}", v)).unwrap_or_default(),
        result.credit_limit.map(|v| format!("{:.2}", v)).unwrap_or_default(),
        result.fields_extracted.to_string(),
        result.confidence.to_string(),
        result.extraction_method.clone(),
        result.alerts.join("; "),
    ]
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(RESULT_COLUMNS)?;
    wtr.write_record(result_record(result))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn money(value: Option<f64>) -> String {
    value
        .map(|v| format!("₹{}", format_inr(v)))
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or(NOT_FOUND).to_string()
}

pub fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Confidence: {} ({}/{} fields)\n",
        result.confidence.as_str().to_uppercase(),
        result.fields_extracted,
        Field::ALL.len()
    ));
    output.push('\n');

    let card = result
        .card_last_4
        .as_deref()
        .map(|digits| format!("****{}", digits))
        .unwrap_or_else(|| NOT_FOUND.to_string());

    output.push_str(&format!("  Card:             {}\n", card));
    output.push_str(&format!(
        "  Statement period: {}\n",
        text(result.statement_period.as_deref())
    ));
    output.push_str(&format!("  Due date:         {}\n", text(result.due_date.as_deref())));
    output.push_str(&format!("  Amount due:       {}\n", money(result.amount_due)));
    output.push_str(&format!("  Credit limit:     {}\n", money(result.credit_limit)));

    if result.has_warnings {
        output.push_str("\nAlerts:\n");
        for alert in &result.alerts {
            output.push_str(&format!("  - {}\n", alert));
        }
    }

    output
}

/// One line per tier attempt.
pub fn format_trace(trace: &Trace) -> String {
    let mut output = String::new();

    for entry in trace.entries() {
        let outcome = match &entry.outcome {
            TraceOutcome::Resolved { value, origin, .. } => {
                format!("resolved ({}) {}", origin, value)
            }
            TraceOutcome::Miss => "miss".to_string(),
            TraceOutcome::Failed { error } => format!("failed: {}", error),
        };
        output.push_str(&format!(
            "{:<18} {:<7} {}\n",
            entry.field.name(),
            entry.tier.as_str(),
            outcome
        ));
    }

    output
}
