//! Portfolio valuation domain models.
//!
//! Everything here is derived per run and never persisted, except the
//! per-holding market values that feed the next snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A usable price for a holding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Price in the holding's own currency
    pub native_price: Decimal,
    /// Currency of `native_price`
    pub currency: String,
    /// Multiplier from `currency` into the base currency (1 for base currency holdings)
    pub fx_rate: Decimal,
    /// Session change of the underlying quote, when known
    pub change_percent: Option<Decimal>,
}

impl PricePoint {
    pub fn in_base_currency(native_price: Decimal, base_currency: &str) -> Self {
        Self {
            native_price,
            currency: base_currency.to_string(),
            fx_rate: Decimal::ONE,
            change_percent: None,
        }
    }

    /// Price converted into the base currency.
    pub fn base_price(&self) -> Decimal {
        self.native_price * self.fx_rate
    }
}

/// Result of trying to price a holding.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceOutcome {
    Available(PricePoint),
    Unavailable(String),
}

/// Figures for a holding that could be priced. Amounts are in base currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricedHolding {
    pub price: PricePoint,
    pub cost_total: Decimal,
    pub market_value: Decimal,
    pub profit: Decimal,
    /// `None` when the cost basis is zero
    pub return_percent: Option<Decimal>,
    /// Share of the bucket's market value, 0-100
    pub weight_percent: Decimal,
    /// Change against the previous snapshot (0 on the first run)
    pub delta: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum HoldingStatus {
    Priced(PricedHolding),
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub key: String,
    pub name: String,
    pub symbol: String,
    pub account: Option<String>,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub currency: String,
    /// Amount recorded for this key in the previous snapshot
    pub previous_amount: Option<Decimal>,
    pub status: HoldingStatus,
}

impl HoldingValuation {
    pub fn priced(&self) -> Option<&PricedHolding> {
        match &self.status {
            HoldingStatus::Priced(priced) => Some(priced),
            HoldingStatus::Unavailable { .. } => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.status {
            HoldingStatus::Priced(_) => None,
            HoldingStatus::Unavailable { reason } => Some(reason),
        }
    }

    pub fn is_available(&self) -> bool {
        self.priced().is_some()
    }
}

/// Aggregates over the priced holdings of a group. Unavailable holdings
/// are only counted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationTotals {
    pub cost: Decimal,
    pub market_value: Decimal,
    pub profit: Decimal,
    pub return_percent: Option<Decimal>,
    pub delta: Decimal,
    pub priced_count: usize,
    pub unavailable_count: usize,
}

/// Holdings of one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketValuation {
    /// Account label; `None` for holdings without an account
    pub label: Option<String>,
    pub holdings: Vec<HoldingValuation>,
    pub totals: ValuationTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub title: String,
    pub base_currency: String,
    pub as_of: DateTime<Utc>,
    /// Currency -> rate into the base currency, for rates that were fetched
    pub fx_rates: BTreeMap<String, Decimal>,
    pub buckets: Vec<BucketValuation>,
    pub totals: ValuationTotals,
}

impl PortfolioValuation {
    pub fn holdings(&self) -> impl Iterator<Item = &HoldingValuation> {
        self.buckets.iter().flat_map(|bucket| bucket.holdings.iter())
    }
}
