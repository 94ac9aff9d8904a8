//! AtVenu configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ATVENU_API_TOKEN` - AtVenu API key, sent as the `x-api-key` header.
//!   `API_TOKEN` is read when it is unset.
//!
//! ## Optional
//! - `ATVENU_ENDPOINT` - GraphQL endpoint (default: `https://api.atvenu.com/`)

use std::collections::HashMap;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default AtVenu GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.atvenu.com/";

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// AtVenu API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct AtVenuConfig {
    /// API key for the `x-api-key` header
    pub api_token: SecretString,
    /// GraphQL endpoint URL
    pub endpoint: Url,
}

impl std::fmt::Debug for AtVenuConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtVenuConfig")
            .field("api_token", &"[REDACTED]")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl AtVenuConfig {
    /// Build a configuration from explicit values.
    #[must_use]
    pub const fn new(api_token: SecretString, endpoint: Url) -> Self {
        Self {
            api_token,
            endpoint,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the token is missing or a placeholder, or the
    /// endpoint is not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AtVenuConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let api_token = non_blank("ATVENU_API_TOKEN")
            .or_else(|| non_blank("API_TOKEN"))
            .ok_or_else(|| ConfigError::MissingEnvVar("ATVENU_API_TOKEN".to_string()))?;
        check_placeholder(&api_token, "ATVENU_API_TOKEN")?;
        if let Err(e) = check_entropy(&api_token, "ATVENU_API_TOKEN") {
            tracing::warn!("ATVENU_API_TOKEN validation warning: {e}");
        }

        let endpoint = lookup("ATVENU_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| ConfigError::InvalidEnvVar("ATVENU_ENDPOINT".to_string(), e.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "ATVENU_ENDPOINT".to_string(),
                format!("unsupported scheme '{}'", endpoint.scheme()),
            ));
        }

        Ok(Self {
            api_token: SecretString::from(api_token),
            endpoint,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Reject values copied verbatim from a `.env.example`.
fn check_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

fn check_entropy(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }
    Ok(())
}
