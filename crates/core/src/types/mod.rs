//! Core types for Settlement Sync.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod date_range;
pub mod id;
pub mod price;
pub mod sold;

pub use date_range::{DateRange, DateRangeError};
pub use id::*;
pub use price::UnitPrice;
pub use sold::{SoldRecord, sold_quantity};
