//! Extract command - pull metadata out of a single task description.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use gstmeta_core::{
    ExtractedMeta, ExtractionResult, Field, FieldSource, FilingReport, GstMetaConfig, MetaParser,
    TaskContext,
};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file, or `-` to read stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Task heading, used for the trade name when the text has none
    #[arg(long)]
    heading: Option<String>,

    /// Topic title, used for the trade name after the heading
    #[arg(long)]
    topic: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Emit the filing report (due dates, welcome title) instead of the bare fields
    #[arg(long)]
    report: bool,

    /// Show which rule produced each field, and any warnings
    #[arg(long)]
    explain: bool,
}

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
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// What gets written for one description.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Record {
    Meta(ExtractedMeta),
    Report(FilingReport),
}

impl Record {
    /// Build the record for a parse result.
    pub fn new(
        result: &ExtractionResult,
        parser: &MetaParser,
        config: &GstMetaConfig,
        report: bool,
    ) -> Self {
        if report {
            Record::Report(FilingReport::build_with(
                &result.meta,
                &config.report,
                parser.resolver(),
            ))
        } else {
            Record::Meta(result.meta.clone())
        }
    }

    /// Column names and values, in output order.
    pub fn columns(&self) -> Vec<(&'static str, &str)> {
        match self {
            Record::Meta(meta) => Field::ALL
                .into_iter()
                .map(|field| (field.key(), meta.get(field).unwrap_or_default()))
                .collect(),
            Record::Report(report) => vec![
                ("GSTIN", report.gstin.as_str()),
                ("FY", report.fy.as_str()),
                ("ReturnPeriod", report.return_period.as_str()),
                ("TradeName", report.trade_name.as_str()),
                ("LegalName", report.legal_name.as_str()),
                ("DueDateISO", report.gstr1_due_iso.as_str()),
                ("DueDatePretty", report.gstr1_due_display.as_str()),
                ("GSTR3BDueDateISO", report.gstr3b_due_iso.as_str()),
                ("GSTR3BDueDatePretty", report.gstr3b_due_display.as_str()),
                ("WelcomeTitle", report.welcome_title.as_str()),
            ],
        }
    }
}

#[derive(Serialize)]
struct Explained<'a> {
    #[serde(flatten)]
    record: &'a Record,
    sources: &'a [FieldSource],
    warnings: &'a [String],
    processing_time_ms: u64,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let text = read_input(&args.input).await?;
    info!("Extracting from {}", describe_input(&args.input));

    let context = TaskContext::new(
        args.heading.clone().unwrap_or_default(),
        args.topic.clone().unwrap_or_default(),
    );
    let parser = MetaParser::from_config(&config.extraction);
    let result = parser.parse_with_context(&text, &context);
    let record = Record::new(&result, &parser, &config, args.report);

    if args.explain && !result.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let output = format_record(&record, args.format, args.explain.then_some(&result))?;

    if let Some(output_path) = &args.output {
        tokio::fs::write(output_path, &output).await?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

async fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    Ok(tokio::fs::read_to_string(input).await?)
}

fn describe_input(input: &Path) -> String {
    if input == Path::new("-") {
        "stdin".to_string()
    } else {
        input.display().to_string()
    }
}

/// Render a record in the requested format. `explain` adds provenance.
pub fn format_record(
    record: &Record,
    format: OutputFormat,
    explain: Option<&ExtractionResult>,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => match explain {
            Some(result) => Ok(serde_json::to_string_pretty(&Explained {
                record,
                sources: &result.sources,
                warnings: &result.warnings,
                processing_time_ms: result.processing_time_ms,
            })?),
            None => Ok(serde_json::to_string_pretty(record)?),
        },
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record, explain)),
    }
}

fn format_csv(record: &Record) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let columns = record.columns();

    wtr.write_record(columns.iter().map(|(key, _)| *key))?;
    wtr.write_record(columns.iter().map(|(_, value)| *value))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &Record, explain: Option<&ExtractionResult>) -> String {
    let mut output = String::new();

    for (key, value) in record.columns() {
        let value = if value.is_empty() { "-" } else { value };
        let _ = writeln!(output, "{:<20} {}", format!("{}:", key), value);
    }

    if let Some(result) = explain {
        output.push('\n');
        output.push_str("Sources:\n");
        for source in &result.sources {
            let _ = writeln!(
                output,
                "  {:<13} {} ({}) <- {:?}",
                source.field.key(),
                source.rule,
                source.scope,
                source.matched
            );
        }
    }

    output
}
