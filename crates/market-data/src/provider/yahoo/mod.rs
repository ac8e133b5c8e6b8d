//! Yahoo Finance chart provider.
//!
//! Uses the public v8 chart endpoint, which needs no crumb or API key:
//! `GET /v8/finance/chart/{symbol}` → `chart.result[0].meta.regularMarketPrice`.
//! Works for US equities/ETFs (e.g. SPYM), indices (^GSPC) and FX pairs (KRW=X).

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use num_traits::FromPrimitive;
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::{Quote, QuoteSource};
use crate::provider::http::build_client;
use crate::provider::{QuoteProvider, RateLimit, DEFAULT_REQUEST_TIMEOUT};

use models::YahooChartResponse;

/// Provider ID constant
const PROVIDER_ID: &str = "YAHOO";

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart provider.
///
/// # Example
///
/// ```ignore
/// use foliobot_market_data::YahooChartProvider;
///
/// let provider = YahooChartProvider::new(Duration::from_secs(10));
/// let quote = provider.get_latest_quote("SPYM").await?;
/// ```
pub struct YahooChartProvider {
    client: Client,
    base_url: String,
}

impl YahooChartProvider {
    /// Create a new provider with the given per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different host (used by tests and mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }
}

impl Default for YahooChartProvider {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}

/// Parses a chart API body into a [`Quote`].
///
/// `fetched_at` is used when the payload carries no market time.
pub fn parse_chart_response(
    symbol: &str,
    body: &str,
    fetched_at: DateTime<Utc>,
) -> Result<Quote, MarketDataError> {
    let response: YahooChartResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::ParseFailed {
            provider: PROVIDER_ID.to_string(),
            message: e.to_string(),
        })?;

    if let Some(error) = response.chart.error {
        debug!(
            "Yahoo chart error for {}: {:?} {:?}",
            symbol, error.code, error.description
        );
        return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
    }

    let meta = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .map(|result| result.meta)
        .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

    let raw_price = meta
        .regular_market_price
        .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;
    let price = to_decimal(raw_price)?;
    if price <= Decimal::ZERO {
        return Err(MarketDataError::ParseFailed {
            provider: PROVIDER_ID.to_string(),
            message: format!("Non-positive price {} for {}", raw_price, symbol),
        });
    }

    let previous_close = meta
        .chart_previous_close
        .or(meta.previous_close)
        .map(to_decimal)
        .transpose()?;

    let timestamp = meta
        .regular_market_time
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .unwrap_or(fetched_at);

    Ok(
        Quote::new(meta.symbol.unwrap_or_else(|| symbol.to_string()), price, timestamp, PROVIDER_ID)
            .with_previous_close(previous_close)
            .with_currency(meta.currency)
            .with_name(meta.long_name.or(meta.short_name)),
    )
}

fn to_decimal(value: f64) -> Result<Decimal, MarketDataError> {
    Decimal::from_f64(value).ok_or_else(|| MarketDataError::ParseFailed {
        provider: PROVIDER_ID.to_string(),
        message: format!("Unrepresentable number: {}", value),
    })
}

#[async_trait]
impl QuoteProvider for YahooChartProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn source(&self) -> QuoteSource {
        QuoteSource::Yahoo
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let url = self.chart_url(symbol);
        debug!("Yahoo request: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::from_status(PROVIDER_ID, symbol, status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        parse_chart_response(symbol, &body, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SPYM_BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "SPYM",
                    "regularMarketPrice": 75.12,
                    "chartPreviousClose": 74.5,
                    "regularMarketTime": 1760644800,
                    "longName": "SPDR Portfolio S&P 500 ETF"
                },
                "timestamp": [1760644800],
                "indicators": {"quote": [{"close": [75.12]}]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_response() {
        let quote = parse_chart_response("SPYM", SPYM_BODY, Utc::now()).unwrap();
        assert_eq!(quote.symbol, "SPYM");
        assert_eq!(quote.price, dec!(75.12));
        assert_eq!(quote.previous_close, Some(dec!(74.5)));
        assert_eq!(quote.currency.as_deref(), Some("USD"));
        assert_eq!(quote.name.as_deref(), Some("SPDR Portfolio S&P 500 ETF"));
        assert_eq!(quote.timestamp.timestamp(), 1760644800);
        assert_eq!(quote.source, "YAHOO");
    }

    #[test]
    fn test_parse_fx_pair_falls_back_to_previous_close() {
        let body = r#"{"chart":{"result":[{"meta":{"currency":"KRW","symbol":"KRW=X",
            "regularMarketPrice":1425.3,"previousClose":1420.1}}],"error":null}}"#;
        let fetched_at = Utc::now();
        let quote = parse_chart_response("KRW=X", body, fetched_at).unwrap();
        assert_eq!(quote.price, dec!(1425.3));
        assert_eq!(quote.previous_close, Some(dec!(1420.1)));
        assert_eq!(quote.timestamp, fetched_at);
    }

    #[test]
    fn test_parse_error_payload_is_symbol_not_found() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found",
            "description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart_response("NOPE", body, Utc::now()).unwrap_err();
        assert!(matches!(err, MarketDataError::SymbolNotFound(ref s) if s == "NOPE"));
    }

    #[test]
    fn test_parse_empty_result_is_symbol_not_found() {
        let body = r#"{"chart":{"result":[],"error":null}}"#;
        let err = parse_chart_response("SPYM", body, Utc::now()).unwrap_err();
        assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
    }

    #[test]
    fn test_parse_missing_price_is_symbol_not_found() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"SPYM"}}],"error":null}}"#;
        let err = parse_chart_response("SPYM", body, Utc::now()).unwrap_err();
        assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
    }

    #[test]
    fn test_parse_malformed_body() {
        let err = parse_chart_response("SPYM", "<html>blocked</html>", Utc::now()).unwrap_err();
        assert!(matches!(err, MarketDataError::ParseFailed { .. }));
    }

    #[test]
    fn test_chart_url() {
        let provider = YahooChartProvider::default().with_base_url("http://localhost:9000/");
        assert_eq!(
            provider.chart_url("KRW=X"),
            "http://localhost:9000/v8/finance/chart/KRW=X"
        );
    }

    #[test]
    fn test_provider_identity() {
        let provider = YahooChartProvider::default();
        assert_eq!(provider.id(), "YAHOO");
        assert_eq!(provider.source(), QuoteSource::Yahoo);
        assert_eq!(provider.rate_limit(), RateLimit::default());
    }
}
