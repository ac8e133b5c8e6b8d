use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest quote for a symbol, as returned by a provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol or code the quote was requested for
    pub symbol: String,

    /// Current / last traded price (required)
    pub price: Decimal,

    /// Prior session close, when the source exposes it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<Decimal>,

    /// Quote currency, when the source reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Display name reported by the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Time of the quote (market time if known, fetch time otherwise)
    pub timestamp: DateTime<Utc>,

    /// Source of the quote (NAVER, YAHOO, ...)
    pub source: String,
}

impl Quote {
    /// Create a new quote with minimal required fields
    pub fn new(symbol: impl Into<String>, price: Decimal, timestamp: DateTime<Utc>, source: &str) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            previous_close: None,
            currency: None,
            name: None,
            timestamp,
            source: source.to_string(),
        }
    }

    pub fn with_previous_close(mut self, previous_close: Option<Decimal>) -> Self {
        self.previous_close = previous_close;
        self
    }

    pub fn with_currency(mut self, currency: Option<String>) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Session change in percent against the previous close.
    ///
    /// `None` when the previous close is unknown or zero.
    pub fn change_percent(&self) -> Option<Decimal> {
        let previous = self.previous_close?;
        if previous.is_zero() {
            return None;
        }
        Some((self.price - previous) / previous * Decimal::ONE_HUNDRED)
    }
}
