//! Pure valuation arithmetic: per-holding figures, bucket weights and totals.
//!
//! Missing-price policy: a holding without a price is reported as
//! unavailable and left out of every aggregate. Its previous snapshot
//! amount is carried into the next snapshot unchanged.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;

use super::{
    BucketValuation, HoldingStatus, HoldingValuation, PortfolioValuation, PriceOutcome,
    PricedHolding, ValuationTotals,
};
use crate::constants::SNAPSHOT_DECIMAL_PRECISION;
use crate::portfolio::holdings::{Holding, PortfolioConfig};
use crate::portfolio::snapshot::Snapshot;

/// Return in percent, or `None` when there is no cost to divide by.
pub fn return_percent(profit: Decimal, cost: Decimal) -> Option<Decimal> {
    if cost.is_zero() {
        None
    } else {
        Some(profit / cost * Decimal::ONE_HUNDRED)
    }
}

/// Values a single holding. Weight is left at zero; see [`apply_weights`].
pub fn value_holding(
    holding: &Holding,
    base_currency: &str,
    outcome: &PriceOutcome,
    previous_amount: Option<Decimal>,
) -> HoldingValuation {
    let status = match outcome {
        PriceOutcome::Available(price) => {
            let cost_total = holding.cost_total() * price.fx_rate;
            let market_value = holding.quantity * price.base_price();
            let profit = market_value - cost_total;
            HoldingStatus::Priced(PricedHolding {
                price: price.clone(),
                cost_total,
                market_value,
                profit,
                return_percent: return_percent(profit, cost_total),
                weight_percent: Decimal::ZERO,
                delta: previous_amount.map_or(Decimal::ZERO, |previous| market_value - previous),
            })
        }
        PriceOutcome::Unavailable(reason) => HoldingStatus::Unavailable {
            reason: reason.clone(),
        },
    };

    HoldingValuation {
        key: holding.key(),
        name: holding.name.clone(),
        symbol: holding.symbol.clone(),
        account: holding.account.clone(),
        quantity: holding.quantity,
        unit_cost: holding.unit_cost,
        currency: holding.currency_or(base_currency).to_string(),
        previous_amount,
        status,
    }
}

/// Sets each priced holding's weight to its share of `total`.
/// A zero total gives every member 0%.
pub fn apply_weights(holdings: &mut [HoldingValuation], total: Decimal) {
    for holding in holdings.iter_mut() {
        if let HoldingStatus::Priced(priced) = &mut holding.status {
            priced.weight_percent = if total.is_zero() {
                Decimal::ZERO
            } else {
                priced.market_value / total * Decimal::ONE_HUNDRED
            };
        }
    }
}

/// Sums the priced holdings; unavailable ones are only counted.
pub fn summarize<'a, I>(holdings: I) -> ValuationTotals
where
    I: IntoIterator<Item = &'a HoldingValuation>,
{
    let mut totals = ValuationTotals::default();
    for holding in holdings {
        match holding.priced() {
            Some(priced) => {
                totals.cost += priced.cost_total;
                totals.market_value += priced.market_value;
                totals.delta += priced.delta;
                totals.priced_count += 1;
            }
            None => totals.unavailable_count += 1,
        }
    }
    totals.profit = totals.market_value - totals.cost;
    totals.return_percent = return_percent(totals.profit, totals.cost);
    totals
}

/// Orders bucket labels: configured accounts first, then unlisted
/// accounts in first-seen order, then the unlabeled bucket.
fn bucket_order(config: &PortfolioConfig) -> Vec<Option<String>> {
    let mut order: Vec<Option<String>> = Vec::new();
    let mut push = |label: Option<String>| {
        if !order.contains(&label) {
            order.push(label);
        }
    };

    for account in &config.accounts {
        push(Some(account.clone()));
    }
    for holding in &config.holdings {
        if holding.account.is_some() {
            push(holding.account.clone());
        }
    }
    if config.holdings.iter().any(|h| h.account.is_none()) {
        push(None);
    }
    order
}

/// Values every configured holding and groups the results by account.
///
/// `outcomes` is keyed by [`Holding::key`]; a holding with no entry is
/// treated as unavailable.
pub fn calculate_portfolio(
    config: &PortfolioConfig,
    outcomes: &HashMap<String, PriceOutcome>,
    snapshot: &Snapshot,
    fx_rates: BTreeMap<String, Decimal>,
    as_of: DateTime<Utc>,
) -> PortfolioValuation {
    let missing = PriceOutcome::Unavailable("no quote requested".to_string());

    let mut grouped: HashMap<Option<String>, Vec<HoldingValuation>> = HashMap::new();
    for holding in &config.holdings {
        let key = holding.key();
        let outcome = outcomes.get(&key).unwrap_or(&missing);
        let valuation = value_holding(holding, &config.base_currency, outcome, snapshot.get(&key));
        grouped
            .entry(holding.account.clone())
            .or_default()
            .push(valuation);
    }

    let buckets: Vec<BucketValuation> = bucket_order(config)
        .into_iter()
        .filter_map(|label| {
            let mut holdings = grouped.remove(&label)?;
            let totals = summarize(&holdings);
            apply_weights(&mut holdings, totals.market_value);
            Some(BucketValuation {
                label,
                holdings,
                totals,
            })
        })
        .collect();

    let totals = summarize(buckets.iter().flat_map(|bucket| bucket.holdings.iter()));
    debug!(
        "Valued {} holdings ({} unavailable), total {}",
        totals.priced_count + totals.unavailable_count,
        totals.unavailable_count,
        totals.market_value
    );

    PortfolioValuation {
        title: config.title.clone(),
        base_currency: config.base_currency.clone(),
        as_of,
        fx_rates,
        buckets,
        totals,
    }
}

/// Builds the snapshot to persist after this run.
///
/// Priced holdings record their current market value. Unavailable holdings
/// keep their previous amount, if there was one. Keys no longer configured
/// are dropped.
pub fn next_snapshot(valuation: &PortfolioValuation) -> Snapshot {
    valuation
        .holdings()
        .filter_map(|holding| {
            let amount = match holding.priced() {
                Some(priced) => Some(priced.market_value.round_dp(SNAPSHOT_DECIMAL_PRECISION)),
                None => holding.previous_amount,
            }?;
            Some((holding.key.clone(), amount))
        })
        .collect()
}
