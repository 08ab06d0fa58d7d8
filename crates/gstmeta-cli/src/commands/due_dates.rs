//! Due-dates command - GSTR-1 and GSTR-3B due dates for a return period.

use std::fmt::Write as _;

use clap::Args;
use serde::Serialize;

use gstmeta_core::meta::resolver::PeriodResolver;
use gstmeta_core::report::{due_dates, DueDate};
use gstmeta_core::ResolvedPeriod;

use super::extract::OutputFormat;
use super::load_config;

/// Arguments for the due-dates command.
#[derive(Args)]
pub struct DueDatesArgs {
    /// Return period, e.g. "March", "Mar 2024", "03/2024"
    #[arg(short, long)]
    period: String,

    /// Financial year the period belongs to, e.g. "2023-2024"
    #[arg(long)]
    fy: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct DueDatesOutput {
    period: String,
    due_dates: Vec<DueDate>,
}

pub async fn run(args: DueDatesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let resolver =
        PeriodResolver::new().with_numeric_periods(config.extraction.resolve_numeric_periods);

    let fy = args.fy.as_deref().unwrap_or_default();
    let period = resolve(&resolver, &args.period, fy)?;
    let output = DueDatesOutput {
        period: period.to_string(),
        due_dates: due_dates(period, &config.report.date_format),
    };

    println!("{}", format_output(&output, args.format)?.trim_end());
    Ok(())
}

fn resolve(resolver: &PeriodResolver, raw: &str, fy: &str) -> anyhow::Result<ResolvedPeriod> {
    match resolver.resolve(raw, fy) {
        (Some(month), Some(year)) => Ok(ResolvedPeriod::new(month, year)),
        (Some(month), None) => anyhow::bail!(
            "No year for return period '{}' ({}). Pass --fy or include the year.",
            raw,
            month.name()
        ),
        _ => anyhow::bail!("Could not resolve return period '{}'", raw),
    }
}

fn format_output(output: &DueDatesOutput, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(output)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["period", "return", "due_date", "display"])?;
            for due in &output.due_dates {
                wtr.write_record([
                    output.period.as_str(),
                    due.kind.label(),
                    due.iso.as_str(),
                    due.display.as_str(),
                ])?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut text = String::new();
            let _ = writeln!(text, "Return period: {}", output.period);
            for due in &output.due_dates {
                let _ = writeln!(
                    text,
                    "{:<8} {} ({})",
                    format!("{}:", due.kind.label()),
                    due.iso,
                    due.display
                );
            }
            Ok(text)
        }
    }
}
