//! CSV artifacts.
//!
//! - Adjustment CSV: ShipHero inventory import, one depletion row per record.
//! - Report CSV: every field of every record, for review.

use std::io;

use serde::Serialize;
use settlement_sync_core::SoldRecord;
use thiserror::Error;

/// `Action` column value: replace the quantity at the location.
pub const ADJUSTMENT_ACTION: &str = "Replace";

/// `Reason` column value.
pub const ADJUSTMENT_REASON: &str = "Nightly Sales";

/// Errors writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing to the destination failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The rendered CSV was not UTF-8.
    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// One row of the adjustment CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustmentRow {
    /// Empty when the variant has no SKU.
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Action")]
    pub action: &'static str,
    /// Negated sold quantity, saturating at the `i64` bounds.
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    /// `"<band> - <tour>"`.
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Reason")]
    pub reason: &'static str,
}

impl From<&SoldRecord> for AdjustmentRow {
    fn from(record: &SoldRecord) -> Self {
        Self {
            sku: record.sku.clone().unwrap_or_default(),
            action: ADJUSTMENT_ACTION,
            quantity: record.sold_quantity.saturating_neg(),
            location: record.location(),
            reason: ADJUSTMENT_REASON,
        }
    }
}

/// One row of the detailed report CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Band")]
    pub band: String,
    #[serde(rename = "Tour Name")]
    pub tour_name: String,
    #[serde(rename = "Venue")]
    pub venue: String,
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "Size")]
    pub size: String,
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "In")]
    pub count_in: i64,
    #[serde(rename = "Out")]
    pub count_out: i64,
    #[serde(rename = "Sold")]
    pub sold: i64,
    #[serde(rename = "Show Date")]
    pub show_date: String,
    #[serde(rename = "Price")]
    pub price: String,
}

impl From<&SoldRecord> for ReportRow {
    fn from(record: &SoldRecord) -> Self {
        Self {
            band: record.band_name.clone(),
            tour_name: record.tour_name.clone(),
            venue: record.venue_description.clone(),
            product_name: record.product_name.clone(),
            size: record.size.clone().unwrap_or_default(),
            sku: record.sku.clone().unwrap_or_default(),
            count_in: record.count_in,
            count_out: record.count_out,
            sold: record.sold_quantity,
            show_date: record.show_date.to_string(),
            price: record.unit_price.to_string(),
        }
    }
}

/// Write the adjustment CSV (`SKU,Action,Quantity,Location,Reason`).
///
/// The header is written even when there are no records.
///
/// # Errors
///
/// Returns `ExportError` if serialization or the writer fails.
pub fn write_adjustments<W: io::Write>(writer: W, records: &[SoldRecord]) -> Result<(), ExportError> {
    write_rows(
        writer,
        &["SKU", "Action", "Quantity", "Location", "Reason"],
        records.iter().map(AdjustmentRow::from),
    )
}

/// Write the detailed report CSV.
///
/// # Errors
///
/// Returns `ExportError` if serialization or the writer fails.
pub fn write_report<W: io::Write>(writer: W, records: &[SoldRecord]) -> Result<(), ExportError> {
    write_rows(
        writer,
        &[
            "Band",
            "Tour Name",
            "Venue",
            "Product Name",
            "Size",
            "SKU",
            "In",
            "Out",
            "Sold",
            "Show Date",
            "Price",
        ],
        records.iter().map(ReportRow::from),
    )
}

/// Render the adjustment CSV to a string.
///
/// # Errors
///
/// Returns `ExportError` if serialization fails.
pub fn adjustments_to_string(records: &[SoldRecord]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_adjustments(&mut buf, records)?;
    Ok(String::from_utf8(buf)?)
}

fn write_rows<W, R, I>(writer: W, header: &[&str], rows: I) -> Result<(), ExportError>
where
    W: io::Write,
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(header)?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}
