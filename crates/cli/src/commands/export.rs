//! Export sold quantities as a ShipHero adjustment CSV.
//!
//! # Environment Variables
//!
//! - `ATVENU_API_TOKEN` - AtVenu API key
//! - `ATVENU_ENDPOINT` - Optional GraphQL endpoint override

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use settlement_sync::export::{ExportError, write_adjustments, write_report};
use settlement_sync::{
    AtVenuClient, AtVenuConfig, AtVenuError, ConfigError, DateRange, DateRangeError,
    TracingObserver, fetch_sold_records,
};
use thiserror::Error;
use tracing::info;

use crate::filter::BandFilter;

/// Errors that can occur during an export.
#[derive(Debug, Error)]
pub enum ExportCommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid date range: {0}")]
    DateRange(#[from] DateRangeError),

    #[error("AtVenu request failed: {0}")]
    AtVenu(#[from] AtVenuError),

    #[error("Failed to write CSV: {0}")]
    Export(#[from] ExportError),

    #[error("Failed to open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
}

/// Parsed `export` arguments.
#[derive(Debug)]
pub struct ExportOptions {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub output: PathBuf,
    pub report: Option<PathBuf>,
    pub filter: BandFilter,
}

/// Run a sync for the requested window and write the CSV artifacts.
///
/// # Errors
///
/// Returns an error if configuration is invalid, any AtVenu request fails,
/// or an output file cannot be written. Nothing is written on a failed sync.
pub async fn run(options: ExportOptions) -> Result<(), ExportCommandError> {
    let range = DateRange::new(options.start, options.end)?;
    let config = AtVenuConfig::from_env()?;
    let client = AtVenuClient::new(&config);

    let report = fetch_sold_records(&client, range, &TracingObserver).await?;
    let records = options.filter.apply(report.records);
    info!(
        records = records.len(),
        join_misses = report.join_misses.len(),
        requests = report.requests,
        "Sync finished"
    );

    if options.output.as_os_str() == "-" {
        let mut stdout = io::stdout().lock();
        write_adjustments(&mut stdout, &records)?;
        stdout.flush().map_err(ExportError::from)?;
    } else {
        write_adjustments(create(&options.output)?, &records)?;
        info!(path = %options.output.display(), "Wrote adjustment CSV");
    }

    if let Some(path) = &options.report {
        write_report(create(path)?, &records)?;
        info!(path = %path.display(), "Wrote report CSV");
    }

    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>, ExportCommandError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ExportCommandError::Open {
            path: path.to_path_buf(),
            source,
        })
}
