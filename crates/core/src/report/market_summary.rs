//! Market overview lines for the watchlist (indices, FX, commodities).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foliobot_market_data::Quote;

use crate::constants::DISPLAY_PERCENT_PRECISION;
use crate::utils::format_utils::{format_amount, format_percent, trend_marker};

/// Decimals shown for index and FX levels.
const INDICATOR_DECIMALS: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum IndicatorStatus {
    Quoted {
        price: Decimal,
        change_percent: Option<Decimal>,
        currency: Option<String>,
    },
    Unavailable {
        reason: String,
    },
}

/// One watchlist entry as observed during a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketIndicator {
    pub label: String,
    pub symbol: String,
    pub status: IndicatorStatus,
}

impl MarketIndicator {
    pub fn from_quote(label: &str, symbol: &str, quote: &Quote) -> Self {
        Self {
            label: label.to_string(),
            symbol: symbol.to_string(),
            status: IndicatorStatus::Quoted {
                price: quote.price,
                change_percent: quote.change_percent(),
                currency: quote.currency.clone(),
            },
        }
    }

    pub fn unavailable(label: &str, symbol: &str, reason: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            symbol: symbol.to_string(),
            status: IndicatorStatus::Unavailable {
                reason: reason.into(),
            },
        }
    }
}

/// Renders the market overview section, or `None` when the watchlist is empty.
pub fn render_market_summary(indicators: &[MarketIndicator]) -> Option<String> {
    if indicators.is_empty() {
        return None;
    }

    let mut lines = vec!["🌐 Market".to_string()];
    for indicator in indicators {
        let line = match &indicator.status {
            IndicatorStatus::Quoted {
                price,
                change_percent,
                currency,
            } => {
                let mut line = format!(
                    "• {}: {}",
                    indicator.label,
                    format_amount(*price, INDICATOR_DECIMALS)
                );
                if let Some(currency) = currency {
                    line.push(' ');
                    line.push_str(currency);
                }
                if let Some(change) = change_percent {
                    line.push_str(&format!(
                        " {} {}",
                        format_percent(Some(*change), DISPLAY_PERCENT_PRECISION),
                        trend_marker(*change)
                    ));
                }
                line
            }
            IndicatorStatus::Unavailable { reason } => {
                format!("• {}: unavailable ({})", indicator.label, reason)
            }
        };
        lines.push(line);
    }
    Some(lines.join("\n"))
}
