//! Settlement Sync CLI - AtVenu settlement sales to ShipHero adjustments.
//!
//! # Usage
//!
//! ```bash
//! # Export today's sales as an adjustment CSV
//! settle-sync export -o adjustments.csv
//!
//! # Export a date range with a detailed report alongside
//! settle-sync export -s 2024-06-01 -e 2024-06-07 -o adjustments.csv --report report.csv
//!
//! # Only some bands
//! settle-sync export -s 2024-06-01 --band "BandX" --exclude-band "Opener"
//!
//! # List the bands with sales in a date range
//! settle-sync bands -s 2024-06-01 -e 2024-06-07
//! ```
//!
//! # Environment Variables
//!
//! - `ATVENU_API_TOKEN` - AtVenu API key (required, falls back to `API_TOKEN`)
//! - `ATVENU_ENDPOINT` - GraphQL endpoint (default `https://api.atvenu.com/`)
//! - `LOG_FORMAT` - `json` for structured logs, text otherwise
//! - `SENTRY_DSN` - Enables Sentry error reporting when set

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

mod commands;
mod filter;
mod telemetry;

#[derive(Parser)]
#[command(name = "settle-sync")]
#[command(author, version, about = "AtVenu settlement sync tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch sold quantities and write the adjustment CSV
    Export(ExportArgs),
    /// List the bands with sales in the date range
    Bands(RangeArgs),
}

#[derive(Args)]
struct RangeArgs {
    /// First show date (YYYY-MM-DD, default today)
    #[arg(short, long)]
    start: Option<NaiveDate>,

    /// Last show date (YYYY-MM-DD, default the start date)
    #[arg(short, long)]
    end: Option<NaiveDate>,
}

impl RangeArgs {
    fn resolve(&self) -> (NaiveDate, NaiveDate) {
        let start = self
            .start
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        (start, self.end.unwrap_or(start))
    }
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    range: RangeArgs,

    /// Adjustment CSV path (`-` for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Also write a detailed report CSV to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Only include these bands (repeatable)
    #[arg(long = "band")]
    bands: Vec<String>,

    /// Exclude these bands (repeatable)
    #[arg(long = "exclude-band")]
    excluded_bands: Vec<String>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Sentry must be initialized before the subscriber
    let _sentry_guard = telemetry::init_sentry();
    telemetry::init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Export(args) => {
            let (start, end) = args.range.resolve();
            let options = commands::export::ExportOptions {
                start,
                end,
                output: args.output,
                report: args.report,
                filter: filter::BandFilter::new(args.bands, args.excluded_bands),
            };
            commands::export::run(options).await?;
        }
        Commands::Bands(range) => {
            let (start, end) = range.resolve();
            commands::bands::run(start, end).await?;
        }
    }
    Ok(())
}
