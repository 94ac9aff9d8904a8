//! Settlement Sync - AtVenu settlement counts to inventory adjustments.
//!
//! Walks the AtVenu hierarchy (accounts → tours → shows → settlement counts),
//! joins each count against the account's merchandise catalog and derives a
//! sold quantity per SKU per show. The result can be exported as a ShipHero
//! inventory adjustment CSV.
//!
//! # Architecture
//!
//! - [`atvenu`] - GraphQL client and the cursor-paginated collectors
//! - [`join`] - Pure count ⨝ catalog derivation
//! - [`pipeline`] - Sequential orchestration of a whole sync
//! - [`events`] - Observer interface for progress and diagnostics
//! - [`export`] - CSV artifacts
//! - [`cache`] - Date-range memoization for long-lived callers
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use settlement_sync::{AtVenuConfig, DateRange, pipeline};
//!
//! let config = AtVenuConfig::from_env()?;
//! let range = DateRange::parse("2024-06-01", "2024-06-02")?;
//! let records = pipeline::fetch_data(&config, range).await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod atvenu;
pub mod cache;
pub mod config;
pub mod events;
pub mod export;
pub mod join;
pub mod pipeline;

pub use atvenu::{AtVenuClient, AtVenuError};
pub use cache::CachedSync;
pub use config::{AtVenuConfig, ConfigError};
pub use events::{NoopObserver, RecordingObserver, SyncEvent, SyncObserver, TracingObserver};
pub use pipeline::{SyncReport, fetch_data, fetch_sold_records};
pub use settlement_sync_core::{DateRange, DateRangeError, SoldRecord, UnitPrice};
