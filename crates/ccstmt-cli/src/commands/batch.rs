//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task;
use tracing::{debug, error, warn};

use ccstmt_core::evidence::{self, InputFormat};
use ccstmt_core::models::config::PdfConfig;
use ccstmt_core::{ArtifactWriter, Document, Extraction, StatementExtractor, StatementParser};

use super::format::{OutputFormat, RESULT_COLUMNS, format_result, result_record};
use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Write result, evidence and trace artifacts to this directory
    #[arg(long)]
    artifacts: Option<PathBuf>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Result<(Document, Extraction), String>,
    processing_time_ms: u64,
}

impl ProcessResult {
    fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("statement")
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| InputFormat::from_path(p).is_ok())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(StatementParser::with_config(config.extraction.clone()));
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));

    // One blocking task per file, at most `jobs` running at once
    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let parser = Arc::clone(&parser);
            let permits = Arc::clone(&permits);
            let pdf = config.pdf.clone();

            tokio::spawn(async move {
                let _permit = permits.acquire_owned().await?;
                let result = task::spawn_blocking(move || process_file(path, &parser, &pdf)).await?;
                anyhow::Ok(result)
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await??;

        if let Err(error_msg) = &result.outcome {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        results.push(result);
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    // Write outputs
    for result in &results {
        let Ok((document, extraction)) = &result.outcome else {
            continue;
        };

        if let Some(output_dir) = &args.output_dir {
            let output_path =
                output_dir.join(format!("{}.{}", result.stem(), args.format.extension()));
            fs::write(&output_path, format_result(&extraction.result, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }

        if let Some(dir) = &args.artifacts {
            ArtifactWriter::from_config(&config.output)
                .with_dir(dir.clone())
                .write(result.stem(), document, extraction)?;
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.outcome.is_err()).collect();

    // Print summary
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(error_msg) = &result.outcome {
                println!("  - {}: {}", result.path.display(), error_msg);
            }
        }
    }

    Ok(())
}

fn process_file(path: PathBuf, parser: &StatementParser, pdf: &PdfConfig) -> ProcessResult {
    let file_start = Instant::now();

    let outcome = evidence::open(&path, pdf)
        .and_then(|source| source.load_document())
        .map(|document| {
            let extraction = parser.extract(&document);
            (document, extraction)
        })
        .map_err(|e| e.to_string());

    ProcessResult {
        path,
        outcome,
        processing_time_ms: file_start.elapsed().as_millis() as u64,
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(RESULT_COLUMNS);
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut record = vec![filename];
        match &result.outcome {
            Ok((_, extraction)) => {
                record.push("success".to_string());
                record.extend(result_record(&extraction.result));
                record.push(result.processing_time_ms.to_string());
                record.push(String::new());
            }
            Err(error_msg) => {
                record.push("error".to_string());
                record.extend(RESULT_COLUMNS.iter().map(|_| String::new()));
                record.push(result.processing_time_ms.to_string());
                record.push(error_msg.clone());
            }
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
