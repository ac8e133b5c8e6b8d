//! Naver Finance screen-scrape provider.
//!
//! Reads the item page `https://finance.naver.com/item/main.naver?code={code}`
//! and extracts:
//! - current price: `p.no_today span.blind`
//! - previous close: `table.no_info td.first span.blind` (optional)
//! - display name: `.wrap_company h2 a` (optional)
//!
//! The page is served as EUC-KR unless the response says otherwise.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use encoding_rs::{Encoding, EUC_KR};
use reqwest::{header, Client};
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::{Quote, QuoteSource};
use crate::provider::http::build_client;
use crate::provider::{QuoteProvider, RateLimit, DEFAULT_REQUEST_TIMEOUT};

/// Provider ID constant
const PROVIDER_ID: &str = "NAVER";

const DEFAULT_BASE_URL: &str = "https://finance.naver.com";

const PRICE_SELECTOR: &str = "p.no_today span.blind";
const PREVIOUS_CLOSE_SELECTOR: &str = "table.no_info td.first span.blind";
const NAME_SELECTOR: &str = ".wrap_company h2 a";

/// Naver Finance blocks clients that hit it back to back.
const NAVER_MIN_DELAY: Duration = Duration::from_millis(500);

/// Naver Finance provider for KRX listed stocks and ETFs.
pub struct NaverFinanceProvider {
    client: Client,
    base_url: String,
}

impl NaverFinanceProvider {
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

    fn item_url(&self, code: &str) -> String {
        format!("{}/item/main.naver?code={}", self.base_url, code)
    }
}

impl Default for NaverFinanceProvider {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}

/// Parses a Naver item page into a [`Quote`].
pub fn parse_item_page(
    code: &str,
    html: &str,
    fetched_at: DateTime<Utc>,
) -> Result<Quote, MarketDataError> {
    let document = Html::parse_document(html);

    let price_text = select_text(&document, PRICE_SELECTOR)?
        .ok_or_else(|| MarketDataError::SymbolNotFound(code.to_string()))?;
    let price = parse_number(&price_text)?;

    // Optional: an unparseable previous close is dropped.
    let previous_close = match select_text(&document, PREVIOUS_CLOSE_SELECTOR)? {
        Some(text) => parse_number(&text).ok(),
        None => None,
    };

    let name = select_text(&document, NAME_SELECTOR)?;

    Ok(Quote::new(code, price, fetched_at, PROVIDER_ID)
        .with_previous_close(previous_close)
        .with_currency(Some("KRW".to_string()))
        .with_name(name))
}

/// Returns the trimmed text of the first element matching `selector`.
fn select_text(document: &Html, selector: &str) -> Result<Option<String>, MarketDataError> {
    let selector = Selector::parse(selector).map_err(|e| MarketDataError::ParseFailed {
        provider: PROVIDER_ID.to_string(),
        message: format!("Invalid selector '{}': {:?}", selector, e),
    })?;

    Ok(document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty()))
}

/// Parses a number rendered with thousands separators, e.g. "1,234,500".
fn parse_number(text: &str) -> Result<Decimal, MarketDataError> {
    let cleaned: String = text.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    Decimal::from_str(&cleaned).map_err(|e| MarketDataError::ParseFailed {
        provider: PROVIDER_ID.to_string(),
        message: format!("Invalid number '{}': {}", text, e),
    })
}

/// Picks the decoder from the Content-Type charset, falling back to EUC-KR.
fn response_encoding(content_type: Option<&str>) -> &'static Encoding {
    content_type
        .and_then(|value| {
            value
                .split(';')
                .filter_map(|part| part.trim().strip_prefix("charset="))
                .next()
        })
        .and_then(|label| Encoding::for_label(label.trim_matches('"').as_bytes()))
        .unwrap_or(EUC_KR)
}

#[async_trait]
impl QuoteProvider for NaverFinanceProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn source(&self) -> QuoteSource {
        QuoteSource::Naver
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit::default().with_min_delay(NAVER_MIN_DELAY)
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let url = self.item_url(symbol);
        debug!("Naver request: {}", url);

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

        let encoding = response_encoding(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
        );
        let bytes = response
            .bytes()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;
        let (html, _, _) = encoding.decode(&bytes);

        parse_item_page(symbol, &html, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ITEM_PAGE: &str = r##"
        <html><body>
        <div class="wrap_company"><h2><a href="#">TIGER 미국S&amp;P500</a></h2></div>
        <div class="rate_info">
          <div class="today">
            <p class="no_today">
              <em class="no_up"><span class="blind">21,355</span></em>
            </p>
          </div>
          <table class="no_info">
            <tr>
              <td class="first"><span class="sptxt sp_txt2">전일</span>
                <em><span class="blind">21,120</span></em></td>
              <td><span class="sptxt sp_txt3">고가</span>
                <em><span class="blind">21,400</span></em></td>
            </tr>
          </table>
        </div>
        </body></html>
    "##;

    #[test]
    fn test_parse_item_page() {
        let quote = parse_item_page("360750", ITEM_PAGE, Utc::now()).unwrap();
        assert_eq!(quote.symbol, "360750");
        assert_eq!(quote.price, dec!(21355));
        assert_eq!(quote.previous_close, Some(dec!(21120)));
        assert_eq!(quote.name.as_deref(), Some("TIGER 미국S&P500"));
        assert_eq!(quote.currency.as_deref(), Some("KRW"));
        assert_eq!(quote.source, "NAVER");
    }

    #[test]
    fn test_missing_price_element_is_symbol_not_found() {
        let html = "<html><body><p class=\"no_today\"></p></body></html>";
        let err = parse_item_page("000000", html, Utc::now()).unwrap_err();
        assert!(matches!(err, MarketDataError::SymbolNotFound(ref s) if s == "000000"));
    }

    #[test]
    fn test_garbled_price_is_parse_failure() {
        let html = r#"<p class="no_today"><span class="blind">N/A</span></p>"#;
        let err = parse_item_page("360750", html, Utc::now()).unwrap_err();
        assert!(matches!(err, MarketDataError::ParseFailed { .. }));
    }

    #[test]
    fn test_missing_previous_close_is_tolerated() {
        let html = r#"<p class="no_today"><span class="blind">9,932</span></p>"#;
        let quote = parse_item_page("0072R0", html, Utc::now()).unwrap();
        assert_eq!(quote.price, dec!(9932));
        assert!(quote.previous_close.is_none());
        assert!(quote.name.is_none());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1,234,500").unwrap(), dec!(1234500));
        assert_eq!(parse_number(" 115,909 ").unwrap(), dec!(115909));
        assert_eq!(parse_number("1,425.30").unwrap(), dec!(1425.30));
        assert!(parse_number("").is_err());
    }

    #[test]
    fn test_response_encoding() {
        assert_eq!(response_encoding(None), EUC_KR);
        assert_eq!(response_encoding(Some("text/html")), EUC_KR);
        assert_eq!(
            response_encoding(Some("text/html; charset=UTF-8")),
            encoding_rs::UTF_8
        );
        assert_eq!(response_encoding(Some("text/html;charset=euc-kr")), EUC_KR);
    }

    #[test]
    fn test_item_url_and_pacing() {
        let provider = NaverFinanceProvider::default().with_base_url("http://127.0.0.1:8080");
        assert_eq!(
            provider.item_url("278530"),
            "http://127.0.0.1:8080/item/main.naver?code=278530"
        );
        assert_eq!(provider.rate_limit().min_delay, Duration::from_millis(500));
    }
}
