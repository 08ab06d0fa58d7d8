//! CLI application for GST task-description metadata extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, due_dates, extract};

/// GST task metadata - Extract GSTIN, FY, return period and names from task descriptions
#[derive(Parser)]
#[command(name = "gstmeta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract metadata from a single description file (or `-` for stdin)
    Extract(extract::ExtractArgs),

    /// Extract metadata from many description files
    Batch(batch::BatchArgs),

    /// Show GSTR-1 and GSTR-3B due dates for a return period
    DueDates(due_dates::DueDatesArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::DueDates(args) => due_dates::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
