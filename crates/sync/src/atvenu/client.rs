//! AtVenu GraphQL API client.
//!
//! One POST per call, no retry, no timeout beyond the transport default.

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use graphql_client::{QueryBody, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::{AtVenuError, GraphQLError};
use crate::config::AtVenuConfig;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-api-key";

/// AtVenu GraphQL API client.
///
/// Cheap to clone; clones share the HTTP connection pool and request counter.
#[derive(Clone)]
pub struct AtVenuClient {
    inner: Arc<AtVenuClientInner>,
}

struct AtVenuClientInner {
    client: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
    /// Requests issued by this client (and its clones)
    requests: AtomicU64,
}

impl AtVenuClient {
    /// Create a new AtVenu API client.
    #[must_use]
    pub fn new(config: &AtVenuConfig) -> Self {
        Self {
            inner: Arc::new(AtVenuClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint.clone(),
                api_key: config.api_token.clone(),
                requests: AtomicU64::new(0),
            }),
        }
    }

    /// Number of requests sent so far.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.inner.requests.load(Ordering::Relaxed)
    }

    /// Execute a GraphQL query and return the `data` payload.
    ///
    /// Logs the operation name and variables before sending; variables contain
    /// account/tour/show UUIDs.
    ///
    /// # Errors
    ///
    /// Returns `AtVenuError::Http` if the request does not complete.
    /// Returns `AtVenuError::Status` on a non-success HTTP status.
    /// Returns `AtVenuError::GraphQL` if the response carries errors.
    /// Returns `AtVenuError::Parse` if the payload does not match `T`.
    #[instrument(skip(self, query, variables))]
    pub async fn execute<V, T>(
        &self,
        operation_name: &'static str,
        query: &'static str,
        variables: V,
    ) -> Result<T, AtVenuError>
    where
        V: Serialize + Debug,
        T: DeserializeOwned,
    {
        tracing::info!(?variables, "Executing query");

        let body = QueryBody {
            variables,
            query,
            operation_name,
        };

        self.inner.requests.fetch_add(1, Ordering::Relaxed);
        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header(API_KEY_HEADER, self.inner.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "Query failed");
            return Err(AtVenuError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let graphql_response: Response<T> = serde_json::from_slice(&bytes)?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted: Vec<GraphQLError> = errors.into_iter().map(GraphQLError::from).collect();
            tracing::error!(errors = ?converted, "GraphQL query returned errors");
            return Err(AtVenuError::GraphQL(converted));
        }

        graphql_response
            .data
            .ok_or_else(|| AtVenuError::MissingData("no data in response".to_string()))
    }
}

impl std::fmt::Debug for AtVenuClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtVenuClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("api_key", &"[REDACTED]")
            .field("requests", &self.request_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AtVenuConfig {
        AtVenuConfig::new(
            SecretString::from("k3Y9xQ2mP7vL4tR8"),
            Url::parse("http://127.0.0.1:9/").unwrap_or_else(|e| panic!("{e}")),
        )
    }

    #[test]
    fn test_client_creation() {
        let client = AtVenuClient::new(&config());
        assert_eq!(client.request_count(), 0);
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = AtVenuClient::new(&config());
        let debug = format!("{client:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("k3Y9xQ2mP7vL4tR8"));
    }

    #[test]
    fn test_query_body_shape() {
        let body = QueryBody {
            variables: super::super::queries::AccountsVariables { cursor: None },
            query: super::super::queries::ACCOUNTS_QUERY,
            operation_name: "accounts",
        };
        let value = serde_json::to_value(&body).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(value["operationName"], "accounts");
        assert!(value["variables"]["cursor"].is_null());
        assert!(value["query"].as_str().is_some_and(|q| q.contains("organization")));
    }
}
