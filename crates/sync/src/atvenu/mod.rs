//! AtVenu GraphQL API client.
//!
//! Provides read-only access to AtVenu's GraphQL API for walking the
//! organization's accounts, tours and shows, the per-account merchandise
//! catalog, and per-show settlement counts.
//!
//! # Architecture
//!
//! - Single endpoint, `x-api-key` header authentication
//! - Request/response envelopes from the `graphql_client` crate, hand-written
//!   query documents in [`queries`]
//! - Every list is cursor-paginated; [`pagination::collect_pages`] drains a
//!   connection into a `Vec`
//! - One attempt per request: no retry, no rate limiting

pub mod client;
pub mod counts;
pub mod hierarchy;
pub mod merchandise;
pub mod pagination;
pub mod queries;
pub mod types;

pub use client::AtVenuClient;
pub use counts::SettlementCounts;
pub use merchandise::MerchCatalog;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the AtVenu API.
#[derive(Debug, Error)]
pub enum AtVenuError {
    /// HTTP request did not complete.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Query failed with status code: {status}. Response: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response was well-formed but lacked an expected field.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// A `node(uuid:)` lookup returned null.
    #[error("{kind} not found: {id}")]
    NodeNotFound {
        /// Node type that was requested.
        kind: &'static str,
        /// Requested UUID.
        id: String,
    },
}

impl AtVenuError {
    /// Whether the request failed to complete at the transport level.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Whether the server answered but rejected or could not satisfy the query.
    #[must_use]
    pub const fn is_query(&self) -> bool {
        !self.is_transport()
    }
}

/// A GraphQL error returned by the AtVenu API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<String>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone, Copy)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i32,
    /// Column number (1-indexed).
    pub column: i32,
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(error: graphql_client::Error) -> Self {
        Self {
            message: error.message,
            locations: error
                .locations
                .unwrap_or_default()
                .into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: l.line,
                    column: l.column,
                })
                .collect(),
            path: error
                .path
                .unwrap_or_default()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}
