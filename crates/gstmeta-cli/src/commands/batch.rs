//! Batch command - extract metadata from many description files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use gstmeta_core::{ExtractionResult, Field, FilingReport, GstMetaConfig, MetaParser};

use super::extract::{format_record, OutputFormat, Record};
use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching description files
    #[arg(required = true)]
    input: String,

    /// Output directory, one file per description (default: stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Emit filing reports instead of the bare fields
    #[arg(long)]
    report: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of files processed concurrently
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome of processing a single file.
struct FileResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

impl FileResult {
    fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }
}

#[derive(Serialize)]
struct FileRecord<'a> {
    file: &'a str,
    #[serde(flatten)]
    record: &'a Record,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(MetaParser::from_config(&config.extraction));
    let mut pending = stream::iter(files.into_iter().enumerate())
        .map(|(index, path)| {
            let parser = Arc::clone(&parser);
            async move {
                let file_start = Instant::now();
                let outcome = process_file(&path, parser).await;
                let processing_time_ms = file_start.elapsed().as_millis() as u64;
                (index, path, outcome, processing_time_ms)
            }
        })
        .buffer_unordered(args.jobs.max(1));

    let mut indexed = Vec::new();
    while let Some((index, path, outcome, processing_time_ms)) = pending.next().await {
        match outcome {
            Ok(result) => {
                debug!(
                    "{}: {} warnings in {}ms",
                    path.display(),
                    result.warnings.len(),
                    processing_time_ms
                );
                indexed.push((
                    index,
                    FileResult {
                        path,
                        result: Some(result),
                        error: None,
                        processing_time_ms,
                    },
                ));
            }
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    indexed.push((
                        index,
                        FileResult {
                            path,
                            result: None,
                            error: Some(error_msg),
                            processing_time_ms,
                        },
                    ));
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    // Report in input order
    indexed.sort_by_key(|(index, _)| *index);
    let results: Vec<FileResult> = indexed.into_iter().map(|(_, r)| r).collect();

    let records: Vec<(&FileResult, Record)> = results
        .iter()
        .filter_map(|r| {
            let result = r.result.as_ref()?;
            Some((r, Record::new(result, &parser, &config, args.report)))
        })
        .collect();

    match &args.output_dir {
        Some(output_dir) => write_records(output_dir, &records, args.format)?,
        None => println!("{}", format_combined(&records, args.format)?.trim_end()),
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results, &parser, &config)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(records.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn process_file(path: &Path, parser: Arc<MetaParser>) -> anyhow::Result<ExtractionResult> {
    let text = tokio::fs::read_to_string(path).await?;
    let result = tokio::task::spawn_blocking(move || parser.parse(&text)).await?;
    Ok(result)
}

fn write_records(
    output_dir: &Path,
    records: &[(&FileResult, Record)],
    format: OutputFormat,
) -> anyhow::Result<()> {
    for (file, record) in records {
        let output_name = file
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("description");
        let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));

        fs::write(&output_path, format_record(record, format, None)?)?;
        debug!("Wrote output to {}", output_path.display());
    }
    Ok(())
}

fn format_combined(
    records: &[(&FileResult, Record)],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<FileRecord> = records
                .iter()
                .map(|(file, record)| FileRecord {
                    file: file.file_name(),
                    record,
                })
                .collect();
            Ok(serde_json::to_string_pretty(&rows)?)
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            if let Some((_, first)) = records.first() {
                let header = first.columns().into_iter().map(|(key, _)| key);
                wtr.write_record(std::iter::once("file").chain(header))?;
            }
            for (file, record) in records {
                let row = std::iter::once(file.file_name())
                    .chain(record.columns().into_iter().map(|(_, v)| v));
                wtr.write_record(row)?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut output = String::new();
            for (file, record) in records {
                output.push_str(&format!("== {} ==\n", file.file_name()));
                output.push_str(&format_record(record, format, None)?);
                output.push('\n');
            }
            Ok(output)
        }
    }
}

fn write_summary(
    path: &Path,
    results: &[FileResult],
    parser: &MetaParser,
    config: &GstMetaConfig,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(Field::ALL.iter().map(|f| f.key()));
    header.extend([
        "DueDateISO",
        "GSTR3BDueDateISO",
        "warnings",
        "processing_time_ms",
        "error",
    ]);
    wtr.write_record(&header)?;

    for result in results {
        let time = result.processing_time_ms.to_string();

        if let Some(extracted) = &result.result {
            let report =
                FilingReport::build_with(&extracted.meta, &config.report, parser.resolver());
            let warnings = extracted.warnings.len().to_string();

            let mut row = vec![result.file_name(), "success"];
            row.extend(
                Field::ALL
                    .iter()
                    .map(|f| extracted.meta.get(*f).unwrap_or_default()),
            );
            row.extend([
                report.gstr1_due_iso.as_str(),
                report.gstr3b_due_iso.as_str(),
                warnings.as_str(),
                time.as_str(),
                "",
            ]);
            wtr.write_record(&row)?;
        } else {
            let mut row = vec![result.file_name(), "error"];
            row.extend(std::iter::repeat_n("", Field::ALL.len() + 3));
            row.extend([time.as_str(), result.error.as_deref().unwrap_or("")]);
            wtr.write_record(&row)?;
        }
    }

    wtr.flush()?;
    Ok(())
}
