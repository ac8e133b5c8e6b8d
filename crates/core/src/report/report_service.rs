//! One end-to-end reporting run.
//!
//! Order of work: weekend guard, load previous snapshot, FX rates, quotes,
//! watchlist, valuation, render, deliver, save snapshot. Only configuration and
//! snapshot problems abort a run; quote and delivery failures are logged
//! and reflected in the report.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::{info, warn};
use rust_decimal::Decimal;

use foliobot_market_data::{ProviderRegistry, Quote, QuoteSource};

use super::{render_market_closed, render_market_summary, render_report, MarketIndicator};
use crate::errors::Result;
use crate::notify::{DeliveryReport, Notifier};
use crate::portfolio::holdings::{Holding, PortfolioConfig};
use crate::portfolio::snapshot::SnapshotStore;
use crate::portfolio::valuation::{
    calculate_portfolio, next_snapshot, PortfolioValuation, PriceOutcome, PricePoint,
};
use crate::utils::time_utils::is_weekend;

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Write the next snapshot after reporting. Off for dry runs.
    pub persist_snapshot: bool,
    /// Image sent after the text report.
    pub photo_path: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            persist_snapshot: true,
            photo_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub valuation: PortfolioValuation,
    /// Watchlist readings, in configured order.
    pub market: Vec<MarketIndicator>,
    pub delivery: DeliveryReport,
    pub snapshot_saved: bool,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Weekend guard fired; a notice was sent and the snapshot left alone.
    MarketClosed { delivery: DeliveryReport },
    Reported(RunSummary),
}

/// Quotes fetched during a run, keyed by source and symbol.
///
/// A symbol held in several accounts is fetched once.
#[derive(Default)]
struct QuoteCache {
    entries: HashMap<(QuoteSource, String), std::result::Result<Quote, String>>,
}

impl QuoteCache {
    async fn get(
        &mut self,
        registry: &ProviderRegistry,
        source: QuoteSource,
        symbol: &str,
    ) -> std::result::Result<Quote, String> {
        let key = (source, symbol.to_string());
        if let Some(cached) = self.entries.get(&key) {
            return cached.clone();
        }
        let fetched = registry
            .fetch_latest_quote(source, symbol)
            .await
            .map_err(|e| e.to_string());
        self.entries.insert(key, fetched.clone());
        fetched
    }
}

pub struct ReportService {
    portfolio: PortfolioConfig,
    tz: Tz,
    registry: Arc<ProviderRegistry>,
    snapshot_store: Arc<dyn SnapshotStore>,
    notifier: Arc<dyn Notifier>,
    options: RunOptions,
}

impl ReportService {
    pub fn new(
        portfolio: PortfolioConfig,
        registry: Arc<ProviderRegistry>,
        snapshot_store: Arc<dyn SnapshotStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        portfolio.validate()?;
        let tz = portfolio.tz()?;
        Ok(Self {
            portfolio,
            tz,
            registry,
            snapshot_store,
            notifier,
            options: RunOptions::default(),
        })
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn portfolio(&self) -> &PortfolioConfig {
        &self.portfolio
    }

    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunOutcome> {
        if self.portfolio.skip_weekends && is_weekend(now, self.tz) {
            info!("Market closed in {}; sending notice only", self.tz);
            let notice = render_market_closed(&self.portfolio.title, now, self.tz);
            let delivery = self.notifier.send_text(&notice).await;
            return Ok(RunOutcome::MarketClosed { delivery });
        }

        // Fail on a broken snapshot before any network traffic.
        let previous = self.snapshot_store.load()?;

        let mut quotes = QuoteCache::default();
        let fx_rates = self.fetch_fx_rates(&mut quotes).await;
        let outcomes = self.price_holdings(&mut quotes, &fx_rates).await;
        let market = self.fetch_watchlist(&mut quotes).await;

        let valuation = calculate_portfolio(&self.portfolio, &outcomes, &previous, fx_rates, now);
        info!(
            "Valuation complete: {} priced, {} unavailable, total {} {}",
            valuation.totals.priced_count,
            valuation.totals.unavailable_count,
            valuation.totals.market_value.round_dp(0),
            valuation.base_currency
        );

        let mut text = render_report(&valuation, self.tz);
        if let Some(summary) = render_market_summary(&market) {
            text.push_str("\n\n");
            text.push_str(&summary);
        }
        let mut delivery = self.notifier.send_text(&text).await;
        if let Some(photo) = &self.options.photo_path {
            delivery.merge(self.notifier.send_photo(photo, &self.portfolio.title).await);
        }
        if !delivery.is_complete() {
            warn!(
                "{} delivery incomplete: {} of {} parts failed",
                self.notifier.id(),
                delivery.failures.len(),
                delivery.attempted
            );
        }

        let snapshot_saved = if self.options.persist_snapshot {
            self.snapshot_store.save(&next_snapshot(&valuation))?;
            true
        } else {
            info!("Snapshot not persisted for this run");
            false
        };

        Ok(RunOutcome::Reported(RunSummary {
            valuation,
            market,
            delivery,
            snapshot_saved,
        }))
    }

    /// Fetches a rate into the base currency for every foreign currency in
    /// use. Currencies whose rate cannot be fetched are left out.
    async fn fetch_fx_rates(&self, quotes: &mut QuoteCache) -> BTreeMap<String, Decimal> {
        let mut rates = BTreeMap::new();
        for currency in self.portfolio.foreign_currencies() {
            let Some(fx) = self.portfolio.fx_rates.get(&currency) else {
                continue;
            };
            match quotes.get(&self.registry, fx.source, &fx.symbol).await {
                Ok(quote) => {
                    info!(
                        "FX {}/{} = {}",
                        currency, self.portfolio.base_currency, quote.price
                    );
                    rates.insert(currency, quote.price);
                }
                Err(reason) => {
                    warn!(
                        "FX rate {} ({}) unavailable: {}",
                        currency, fx.symbol, reason
                    );
                }
            }
        }
        rates
    }

    async fn fetch_watchlist(&self, quotes: &mut QuoteCache) -> Vec<MarketIndicator> {
        let mut market = Vec::with_capacity(self.portfolio.watchlist.len());
        for item in &self.portfolio.watchlist {
            let indicator = match quotes.get(&self.registry, item.source, &item.symbol).await {
                Ok(quote) => MarketIndicator::from_quote(&item.label, &item.symbol, &quote),
                Err(reason) => {
                    warn!("Watchlist {} ({}) unavailable: {}", item.label, item.symbol, reason);
                    MarketIndicator::unavailable(&item.label, &item.symbol, reason)
                }
            };
            market.push(indicator);
        }
        market
    }

    async fn price_holdings(
        &self,
        quotes: &mut QuoteCache,
        fx_rates: &BTreeMap<String, Decimal>,
    ) -> HashMap<String, PriceOutcome> {
        let mut outcomes = HashMap::with_capacity(self.portfolio.holdings.len());
        for holding in &self.portfolio.holdings {
            let outcome = self.price_holding(holding, quotes, fx_rates).await;
            if let PriceOutcome::Unavailable(reason) = &outcome {
                warn!("{} ({}) unavailable: {}", holding.name, holding.key(), reason);
            }
            outcomes.insert(holding.key(), outcome);
        }
        outcomes
    }

    async fn price_holding(
        &self,
        holding: &Holding,
        quotes: &mut QuoteCache,
        fx_rates: &BTreeMap<String, Decimal>,
    ) -> PriceOutcome {
        let base = self.portfolio.base_currency.as_str();
        let currency = holding.currency_or(base);
        let fx_rate = if currency == base {
            Decimal::ONE
        } else {
            match fx_rates.get(currency) {
                Some(rate) => *rate,
                None => {
                    return PriceOutcome::Unavailable(format!(
                        "no {}/{} exchange rate",
                        currency, base
                    ))
                }
            }
        };

        match quotes.get(&self.registry, holding.source, &holding.symbol).await {
            Ok(quote) => PriceOutcome::Available(PricePoint {
                native_price: quote.price,
                currency: currency.to_string(),
                fx_rate,
                change_percent: quote.change_percent(),
            }),
            Err(reason) => PriceOutcome::Unavailable(reason),
        }
    }
}
