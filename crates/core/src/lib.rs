//! Settlement Sync Core - Shared types library.
//!
//! This crate provides common types used across all Settlement Sync components:
//! - `settlement-sync` - AtVenu client, fetch pipeline and CSV export
//! - `cli` - Command-line front end for running a sync
//!
//! # Architecture
//!
//! The core crate contains only types and arithmetic - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, date ranges, unit prices and sold-quantity records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
