//! Quote provider trait definition.
//!
//! This module defines the core `QuoteProvider` trait that every
//! quote source must implement.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Quote, QuoteSource};

use super::capabilities::RateLimit;

/// Trait for quote providers.
///
/// Implement this trait to add support for a new quote source. The
/// registry routes requests by [`QuoteSource`] and applies the provider's
/// [`RateLimit`] between calls.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use foliobot_market_data::provider::{QuoteProvider, RateLimit};
///
/// struct MyProvider {
///     client: reqwest::Client,
/// }
///
/// #[async_trait]
/// impl QuoteProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn source(&self) -> QuoteSource {
///         QuoteSource::Yahoo
///     }
///
///     // ... implement get_latest_quote
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "NAVER" or "YAHOO".
    /// Used for logging and error messages.
    fn id(&self) -> &'static str;

    /// The quote source this provider serves.
    fn source(&self) -> QuoteSource;

    /// Pacing configuration applied by the registry.
    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    /// Fetch the latest quote for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The provider-specific symbol (e.g. "360750" for Naver, "SPYM" for Yahoo)
    ///
    /// # Returns
    ///
    /// The latest quote on success, or a `MarketDataError` on failure.
    /// A single attempt is made; retries are the registry's concern.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;
}
