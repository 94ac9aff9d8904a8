//! List the bands that sold merchandise in a date range.
//!
//! Runs a full sync and prints each distinct band once, in the order the
//! sync first reached it. Useful for picking `--band` values for `export`.

use std::collections::HashSet;
use std::io::Write;

use chrono::NaiveDate;
use settlement_sync::{
    AtVenuClient, AtVenuConfig, DateRange, SoldRecord, TracingObserver, fetch_sold_records,
};

/// Print one band name per line.
///
/// # Errors
///
/// Returns an error if configuration is missing, the sync fails, or stdout
/// cannot be written.
pub async fn run(start: NaiveDate, end: NaiveDate) -> Result<(), Box<dyn std::error::Error>> {
    let range = DateRange::new(start, end)?;
    let config = AtVenuConfig::from_env()?;
    let client = AtVenuClient::new(&config);

    let report = fetch_sold_records(&client, range, &TracingObserver).await?;
    let bands = distinct_bands(&report.records);
    tracing::info!(bands = bands.len(), "Found bands");

    let mut stdout = std::io::stdout().lock();
    for band in bands {
        writeln!(stdout, "{band}")?;
    }
    Ok(())
}

fn distinct_bands(records: &[SoldRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|record| record.band_name.as_str())
        .filter(|band| seen.insert(*band))
        .collect()
}
