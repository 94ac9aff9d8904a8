//! Inclusive calendar-date window used to select shows.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from building a [`DateRange`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    /// The start date falls after the end date.
    #[error("End date must be on or after start date ({start} > {end})")]
    StartAfterEnd {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// A date string was not `YYYY-MM-DD`.
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    Parse(String),
}

/// An inclusive `[start, end]` range of calendar dates.
///
/// Construction enforces `start <= end`, so any `DateRange` in hand is valid
/// to send to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = DateRangeError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Create a range, rejecting `start > end`.
    ///
    /// # Errors
    ///
    /// Returns `DateRangeError::StartAfterEnd` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a range from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns `DateRangeError::Parse` for malformed dates and
    /// `DateRangeError::StartAfterEnd` for an inverted range.
    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether a show running from `show_start` to `show_end` overlaps this range.
    ///
    /// A missing end date means a single-day show.
    #[must_use]
    pub fn overlaps(&self, show_start: NaiveDate, show_end: Option<NaiveDate>) -> bool {
        let show_end = show_end.unwrap_or(show_start).max(show_start);
        show_start <= self.end && show_end >= self.start
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| DateRangeError::Parse(value.to_string()))
}
