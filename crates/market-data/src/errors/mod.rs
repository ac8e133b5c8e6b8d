//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all quote fetching operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while fetching a quote.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines whether the provider registry tries again.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    /// Covers a missing price element on a scraped page and an empty API result.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider answered, but the payload could not be interpreted.
    #[error("Failed to parse response from {provider}: {message}")]
    ParseFailed {
        /// The provider that returned the payload
        provider: String,
        /// What went wrong while parsing
        message: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a server error (HTTP 5xx).
    #[error("Upstream unavailable: {provider} - HTTP {status}")]
    UpstreamUnavailable {
        /// The provider that failed
        provider: String,
        /// HTTP status code
        status: u16,
    },

    /// A provider-specific error occurred (connection refused, 4xx, ...).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// No provider is registered for the requested quote source.
    #[error("No provider registered for source: {0}")]
    NoProviderForSource(String),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use foliobot_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "YAHOO".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Transient);
    ///
    /// let error = MarketDataError::SymbolNotFound("INVALID".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::UpstreamUnavailable { .. } => {
                RetryClass::Transient
            }

            Self::SymbolNotFound(_)
            | Self::ParseFailed { .. }
            | Self::ProviderError { .. }
            | Self::NoProviderForSource(_) => RetryClass::Never,
        }
    }

    /// Maps a transport error from reqwest into the crate's taxonomy.
    pub(crate) fn from_transport(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Self::ProviderError {
                provider: provider.to_string(),
                message: format!("Request failed: {}", err),
            }
        }
    }

    /// Maps a non-success HTTP status into the crate's taxonomy.
    pub(crate) fn from_status(provider: &str, symbol: &str, status: reqwest::StatusCode) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited {
                provider: provider.to_string(),
            }
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Self::SymbolNotFound(symbol.to_string())
        } else if status.is_server_error() {
            Self::UpstreamUnavailable {
                provider: provider.to_string(),
                status: status.as_u16(),
            }
        } else {
            Self::ProviderError {
                provider: provider.to_string(),
                message: format!("HTTP {}", status),
            }
        }
    }
}
