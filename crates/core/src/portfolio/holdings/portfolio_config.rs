//! The external portfolio configuration record.
//!
//! One JSON file describes everything a run needs to know about the
//! portfolio: report title, base currency, market timezone, account order,
//! FX sources, the market watchlist and the holdings themselves.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use chrono_tz::Tz;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foliobot_market_data::QuoteSource;

use super::Holding;
use crate::constants::{DEFAULT_BASE_CURRENCY, DEFAULT_TIMEZONE};
use crate::errors::{Error, Result};

/// Where to fetch the conversion rate from a foreign currency into the base
/// currency (e.g. USD → KRW via Yahoo `KRW=X`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FxRateSource {
    pub symbol: String,
    pub source: QuoteSource,
}

/// A market indicator shown above the holdings (index, FX pair, commodity).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WatchItem {
    pub label: String,
    pub symbol: String,
    #[serde(default = "default_watch_source")]
    pub source: QuoteSource,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioConfig {
    pub title: String,

    #[serde(default = "default_base_currency")]
    pub base_currency: String,

    /// IANA timezone of the market the report follows.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Send a short notice instead of a report on Saturdays and Sundays.
    #[serde(default)]
    pub skip_weekends: bool,

    /// Display order for accounts. Unlisted accounts follow in first-seen order.
    #[serde(default)]
    pub accounts: Vec<String>,

    /// Foreign currency code -> FX quote used to convert it into the base currency.
    #[serde(default)]
    pub fx_rates: BTreeMap<String, FxRateSource>,

    /// Indices and rates reported before the holdings. Empty means no market section.
    #[serde(default)]
    pub watchlist: Vec<WatchItem>,

    pub holdings: Vec<Holding>,
}

fn default_watch_source() -> QuoteSource {
    QuoteSource::Yahoo
}

fn default_base_currency() -> String {
    DEFAULT_BASE_CURRENCY.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl PortfolioConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json_str(&raw)?;
        debug!(
            "Loaded portfolio '{}' with {} holdings from {}",
            config.title,
            config.holdings.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parses and validates a configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: PortfolioConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::MissingConfigKey("title".to_string()));
        }
        if self.base_currency.trim().is_empty() {
            return Err(Error::MissingConfigKey("baseCurrency".to_string()));
        }
        self.tz()?;

        let mut keys = HashSet::new();
        for holding in &self.holdings {
            if holding.symbol.trim().is_empty() {
                return Err(Error::InvalidConfigValue(format!(
                    "holding '{}' has an empty symbol",
                    holding.name
                )));
            }
            if holding.quantity < Decimal::ZERO {
                return Err(Error::InvalidConfigValue(format!(
                    "holding '{}' has a negative quantity",
                    holding.key()
                )));
            }
            if holding.unit_cost < Decimal::ZERO {
                return Err(Error::InvalidConfigValue(format!(
                    "holding '{}' has a negative unit cost",
                    holding.key()
                )));
            }
            if !keys.insert(holding.key()) {
                return Err(Error::InvalidConfigValue(format!(
                    "duplicate holding key '{}'",
                    holding.key()
                )));
            }
        }

        for item in &self.watchlist {
            if item.label.trim().is_empty() || item.symbol.trim().is_empty() {
                return Err(Error::InvalidConfigValue(format!(
                    "watchlist entry '{}' needs both a label and a symbol",
                    item.symbol
                )));
            }
        }

        for currency in self.foreign_currencies() {
            if !self.fx_rates.contains_key(&currency) {
                return Err(Error::MissingConfigKey(format!("fxRates.{}", currency)));
            }
        }
        Ok(())
    }

    /// The configured market timezone.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| Error::InvalidConfigValue(format!("unknown timezone '{}'", self.timezone)))
    }

    /// Currencies other than the base currency that holdings are quoted in.
    pub fn foreign_currencies(&self) -> BTreeSet<String> {
        self.holdings
            .iter()
            .map(|h| h.currency_or(&self.base_currency))
            .filter(|c| *c != self.base_currency)
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const PENSION: &str = r#"{
        "title": "Pension ETF Report",
        "accounts": ["IRP", "ISA"],
        "holdings": [
            {"name": "TIGER S&P500", "symbol": "360750", "source": "naver",
             "quantity": 50, "unitCost": 24485, "account": "IRP"},
            {"name": "KODEX 200TR", "symbol": "278530", "source": "naver",
             "quantity": 36, "unitCost": 28325, "account": "IRP"},
            {"name": "KODEX 200TR", "symbol": "278530", "source": "naver",
             "quantity": 155, "unitCost": 29532, "account": "ISA"}
        ]
    }"#;

    #[test]
    fn test_defaults() {
        let config = PortfolioConfig::from_json_str(PENSION).unwrap();
        assert_eq!(config.base_currency, "KRW");
        assert_eq!(config.timezone, "Asia/Seoul");
        assert!(!config.skip_weekends);
        assert_eq!(config.tz().unwrap(), chrono_tz::Asia::Seoul);
        assert_eq!(config.holdings.len(), 3);
        assert_eq!(config.holdings[2].quantity, dec!(155));
        assert!(config.foreign_currencies().is_empty());
    }

    #[test]
    fn test_same_symbol_in_two_accounts_is_allowed() {
        let config = PortfolioConfig::from_json_str(PENSION).unwrap();
        let keys: Vec<String> = config.holdings.iter().map(Holding::key).collect();
        assert_eq!(keys, vec!["IRP/360750", "IRP/278530", "ISA/278530"]);
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let raw = r#"{"title": "t", "holdings": [
            {"name": "a", "symbol": "278530", "source": "naver", "quantity": 1, "unitCost": 1},
            {"name": "b", "symbol": "278530", "source": "naver", "quantity": 2, "unitCost": 1}
        ]}"#;
        let err = PortfolioConfig::from_json_str(raw).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue(ref m) if m.contains("278530")));
    }

    #[test]
    fn test_negative_quantity_is_rejected() {
        let raw = r#"{"title": "t", "holdings": [
            {"name": "a", "symbol": "278530", "source": "naver", "quantity": -1, "unitCost": 1}
        ]}"#;
        assert!(matches!(
            PortfolioConfig::from_json_str(raw),
            Err(Error::InvalidConfigValue(_))
        ));
    }

    #[test]
    fn test_foreign_currency_requires_fx_source() {
        let raw = r#"{"title": "t", "holdings": [
            {"name": "SPYM", "symbol": "SPYM", "source": "yahoo", "quantity": 1,
             "unitCost": 62.13, "currency": "USD"}
        ]}"#;
        let err = PortfolioConfig::from_json_str(raw).unwrap_err();
        assert!(matches!(err, Error::MissingConfigKey(ref k) if k == "fxRates.USD"));

        let raw = r#"{"title": "t",
            "fxRates": {"USD": {"symbol": "KRW=X", "source": "yahoo"}},
            "holdings": [
            {"name": "SPYM", "symbol": "SPYM", "source": "yahoo", "quantity": 1,
             "unitCost": 62.13, "currency": "USD"}
        ]}"#;
        let config = PortfolioConfig::from_json_str(raw).unwrap();
        assert_eq!(config.foreign_currencies().into_iter().collect::<Vec<_>>(), vec!["USD"]);
    }

    #[test]
    fn test_watchlist_defaults_to_yahoo() {
        let raw = r#"{"title": "t", "holdings": [],
            "watchlist": [
                {"label": "S&P 500", "symbol": "^GSPC"},
                {"label": "KOSPI", "symbol": "^KS11", "source": "yahoo"}
            ]}"#;
        let config = PortfolioConfig::from_json_str(raw).unwrap();
        assert_eq!(config.watchlist.len(), 2);
        assert_eq!(config.watchlist[0].source, QuoteSource::Yahoo);
        assert_eq!(config.watchlist[1].symbol, "^KS11");

        assert!(PortfolioConfig::from_json_str(PENSION).unwrap().watchlist.is_empty());
    }

    #[test]
    fn test_watchlist_entry_needs_label_and_symbol() {
        let raw = r#"{"title": "t", "holdings": [],
            "watchlist": [{"label": " ", "symbol": "^GSPC"}]}"#;
        assert!(matches!(
            PortfolioConfig::from_json_str(raw),
            Err(Error::InvalidConfigValue(ref m)) if m.contains("^GSPC")
        ));
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let raw = r#"{"title": "t", "timezone": "Mars/Olympus", "holdings": []}"#;
        assert!(matches!(
            PortfolioConfig::from_json_str(raw),
            Err(Error::InvalidConfigValue(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(PortfolioConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = PortfolioConfig::load(Path::new("/nonexistent/portfolio.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigIO(_)));
    }
}
