use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foliobot_market_data::QuoteSource;

/// A single configured position.
///
/// `unit_cost` is the average purchase price per unit, expressed in the
/// holding's own currency.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub name: String,
    pub symbol: String,
    pub source: QuoteSource,
    pub quantity: Decimal,
    pub unit_cost: Decimal,

    /// Quote currency. Falls back to the portfolio base currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Account (bucket) the position lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl Holding {
    /// Stable key used in the snapshot: `account/symbol`, or `symbol`
    /// for holdings without an account.
    pub fn key(&self) -> String {
        match &self.account {
            Some(account) => format!("{}/{}", account, self.symbol),
            None => self.symbol.clone(),
        }
    }

    /// Quote currency, resolved against the portfolio base currency.
    pub fn currency_or<'a>(&'a self, base_currency: &'a str) -> &'a str {
        self.currency.as_deref().unwrap_or(base_currency)
    }

    /// Purchase cost in the holding's currency.
    pub fn cost_total(&self) -> Decimal {
        self.quantity * self.unit_cost
    }
}
