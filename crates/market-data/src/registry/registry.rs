//! Provider registry for routing quote requests.
//!
//! The registry owns one provider per [`QuoteSource`] and handles:
//! - Pacing successive calls to the same provider
//! - A single retry for transient failures (timeout, 429, 5xx)
//!
//! There is no fallback between sources: a Naver code means
//! nothing to Yahoo and vice versa.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::Pacer;
use crate::errors::{MarketDataError, RetryClass};
use crate::models::{Quote, QuoteSource};
use crate::provider::QuoteProvider;

/// Provider registry for quote fetching.
pub struct ProviderRegistry {
    providers: HashMap<QuoteSource, Arc<dyn QuoteProvider>>,
    pacer: Pacer,
    min_delay_override: Option<Duration>,
}

impl ProviderRegistry {
    /// Create a registry from a list of providers.
    ///
    /// If two providers serve the same source, the later one wins.
    pub fn new(providers: Vec<Arc<dyn QuoteProvider>>) -> Self {
        let providers = providers
            .into_iter()
            .map(|provider| (provider.source(), provider))
            .collect();
        Self {
            providers,
            pacer: Pacer::new(),
            min_delay_override: None,
        }
    }

    /// Override every provider's minimum delay between calls.
    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay_override = Some(min_delay);
        self
    }

    /// Whether a provider is registered for `source`.
    pub fn supports(&self, source: QuoteSource) -> bool {
        self.providers.contains_key(&source)
    }

    /// Fetch the latest quote for `symbol` from the provider for `source`.
    ///
    /// Transient failures are retried once; everything else is returned
    /// to the caller as is.
    pub async fn fetch_latest_quote(
        &self,
        source: QuoteSource,
        symbol: &str,
    ) -> Result<Quote, MarketDataError> {
        let provider = self
            .providers
            .get(&source)
            .ok_or_else(|| MarketDataError::NoProviderForSource(source.to_string()))?;

        let rate_limit = provider.rate_limit();
        let min_delay = self.min_delay_override.unwrap_or(rate_limit.min_delay);

        self.pacer.acquire(provider.id(), min_delay).await;
        match provider.get_latest_quote(symbol).await {
            Ok(quote) => {
                debug!("{} quote for {}: {}", provider.id(), symbol, quote.price);
                Ok(quote)
            }
            Err(err) if err.retry_class() == RetryClass::Transient => {
                warn!(
                    "{} failed for {} ({}), retrying once in {:?}",
                    provider.id(),
                    symbol,
                    err,
                    rate_limit.retry_delay
                );
                tokio::time::sleep(rate_limit.retry_delay).await;
                self.pacer.acquire(provider.id(), min_delay).await;
                provider.get_latest_quote(symbol).await
            }
            Err(err) => Err(err),
        }
    }
}
