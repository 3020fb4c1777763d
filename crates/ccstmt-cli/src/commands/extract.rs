//! Extract command - pull statement fields from a single file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ccstmt_core::{ArtifactWriter, StatementParser, evidence};

use super::format::{OutputFormat, format_result, format_trace};
use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (JSON evidence bundle, PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Write result, evidence and trace artifacts to this directory
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// Print the tier-by-tier resolution trace
    #[arg(long)]
    show_trace: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Reading evidence...");

    let source = evidence::open(&args.input, &config.pdf)?;
    let parser = StatementParser::with_config(config.extraction.clone());

    pb.set_message("Extracting fields...");
    let (document, extraction) = parser.extract_from(source.as_ref())?;
    pb.finish_and_clear();

    if let Some(dir) = &args.artifacts {
        let stem = args
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("statement");

        let written = ArtifactWriter::from_config(&config.output)
            .with_dir(dir.clone())
            .write(stem, &document, &extraction)?;
        eprintln!(
            "{} Wrote {} artifacts to {}",
            style("✓").green(),
            written.len(),
            dir.display()
        );
    }

    let output = format_result(&extraction.result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_trace {
        eprintln!();
        eprintln!("{}", style("Resolution trace:").bold());
        eprint!("{}", format_trace(&extraction.trace));
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
