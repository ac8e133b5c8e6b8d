//! Property-based integration tests for valuation, snapshots and message
//! chunking.

use std::collections::{BTreeMap, HashMap};

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use foliobot_core::notify::split_message;
use foliobot_core::portfolio::{
    calculate_portfolio, Holding, JsonFileSnapshotStore, PortfolioConfig, PriceOutcome,
    PricePoint, Snapshot, SnapshotStore,
};
use foliobot_market_data::QuoteSource;

// =============================================================================
// Generators
// =============================================================================

/// Amount with two decimals, non-negative.
fn arb_amount(max_cents: i64) -> impl Strategy<Value = Decimal> {
    (0..max_cents).prop_map(|cents| Decimal::new(cents, 2))
}

/// A holding paired with an optional price (None = unavailable).
fn arb_priced_holding() -> impl Strategy<Value = (Holding, Option<Decimal>)> {
    (
        0u32..5_000,
        arb_amount(10_000_000),
        proptest::option::of(prop_oneof![Just("ISA"), Just("IRP"), Just("Pension")]),
        proptest::option::weighted(0.85, arb_amount(10_000_000)),
    )
        .prop_map(|(quantity, unit_cost, account, price)| {
            let holding = Holding {
                name: "Generated".to_string(),
                symbol: String::new(),
                source: QuoteSource::Naver,
                quantity: Decimal::from(quantity),
                unit_cost,
                currency: None,
                account: account.map(str::to_string),
            };
            (holding, price)
        })
}

/// Up to 12 holdings with unique symbols.
fn arb_portfolio() -> impl Strategy<Value = (PortfolioConfig, HashMap<String, PriceOutcome>)> {
    prop::collection::vec(arb_priced_holding(), 1..12).prop_map(|generated| {
        let mut holdings = Vec::new();
        let mut outcomes = HashMap::new();
        for (index, (mut holding, price)) in generated.into_iter().enumerate() {
            holding.symbol = format!("{:06}", index);
            let outcome = match price {
                Some(price) => PriceOutcome::Available(PricePoint::in_base_currency(price, "KRW")),
                None => PriceOutcome::Unavailable("generated failure".to_string()),
            };
            outcomes.insert(holding.key(), outcome);
            holdings.push(holding);
        }
        let config = PortfolioConfig {
            title: "Generated".to_string(),
            base_currency: "KRW".to_string(),
            timezone: "Asia/Seoul".to_string(),
            skip_weekends: false,
            accounts: vec!["IRP".to_string()],
            fx_rates: BTreeMap::new(),
            watchlist: Vec::new(),
            holdings,
        };
        (config, outcomes)
    })
}

fn arb_snapshot() -> impl Strategy<Value = BTreeMap<String, Decimal>> {
    prop::collection::btree_map(
        "[A-Za-z0-9 ]{1,8}(/[A-Z0-9]{1,6})?",
        prop_oneof![
            (-100_000_000_000i64..100_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
            (any::<i64>(), 0u32..=19).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale)),
        ],
        0..20,
    )
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Bucket weights sum to 100% or are all zero.
    #[test]
    fn prop_bucket_weights_sum_to_hundred((config, outcomes) in arb_portfolio()) {
        let as_of = Utc.with_ymd_and_hms(2025, 3, 14, 6, 40, 0).unwrap();
        let valuation = calculate_portfolio(&config, &outcomes, &Snapshot::default(), BTreeMap::new(), as_of);

        for bucket in &valuation.buckets {
            let weights: Vec<Decimal> = bucket
                .holdings
                .iter()
                .filter_map(|h| h.priced())
                .map(|p| p.weight_percent)
                .collect();
            if weights.is_empty() {
                continue;
            }
            let sum: Decimal = weights.iter().copied().sum();
            if bucket.totals.market_value.is_zero() {
                prop_assert!(weights.iter().all(|w| w.is_zero()));
            } else {
                prop_assert!((sum - Decimal::ONE_HUNDRED).abs() <= Decimal::new(1, 2), "sum = {}", sum);
            }
        }
    }

    /// Member values sum to the bucket total; bucket totals sum to the grand total.
    #[test]
    fn prop_totals_are_sums((config, outcomes) in arb_portfolio()) {
        let as_of = Utc.with_ymd_and_hms(2025, 3, 14, 6, 40, 0).unwrap();
        let valuation = calculate_portfolio(&config, &outcomes, &Snapshot::default(), BTreeMap::new(), as_of);

        let mut grand_value = Decimal::ZERO;
        let mut grand_cost = Decimal::ZERO;
        for bucket in &valuation.buckets {
            let value: Decimal = bucket.holdings.iter().filter_map(|h| h.priced()).map(|p| p.market_value).sum();
            let cost: Decimal = bucket.holdings.iter().filter_map(|h| h.priced()).map(|p| p.cost_total).sum();
            prop_assert_eq!(value, bucket.totals.market_value);
            prop_assert_eq!(cost, bucket.totals.cost);
            grand_value += value;
            grand_cost += cost;
        }
        prop_assert_eq!(grand_value, valuation.totals.market_value);
        prop_assert_eq!(grand_cost, valuation.totals.cost);
        prop_assert_eq!(valuation.totals.profit, grand_value - grand_cost);

        let holding_count: usize = valuation.buckets.iter().map(|b| b.holdings.len()).sum();
        prop_assert_eq!(holding_count, config.holdings.len());
    }

    /// profit = value - cost; return % defined exactly when cost > 0.
    #[test]
    fn prop_profit_and_return((config, outcomes) in arb_portfolio()) {
        let as_of = Utc.with_ymd_and_hms(2025, 3, 14, 6, 40, 0).unwrap();
        let valuation = calculate_portfolio(&config, &outcomes, &Snapshot::default(), BTreeMap::new(), as_of);

        for priced in valuation.holdings().filter_map(|h| h.priced()) {
            prop_assert_eq!(priced.profit, priced.market_value - priced.cost_total);
            match priced.return_percent {
                Some(r) => {
                    prop_assert!(!priced.cost_total.is_zero());
                    prop_assert_eq!(r, priced.profit / priced.cost_total * Decimal::ONE_HUNDRED);
                }
                None => prop_assert!(priced.cost_total.is_zero()),
            }
            // No previous snapshot, so no delta.
            prop_assert!(priced.delta.is_zero());
        }
    }

    /// save(m) followed by load() returns m.
    #[test]
    fn prop_snapshot_round_trip(amounts in arb_snapshot()) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path().join("data").join("last_snapshot.json"));
        let snapshot = Snapshot::new(amounts);

        store.save(&snapshot).unwrap();
        let loaded = store.load().unwrap();
        prop_assert_eq!(loaded, snapshot);
    }

    /// Chunks concatenate to the input, fit the limit in UTF-16 units and are
    /// filled greedily.
    #[test]
    fn prop_split_message_is_lossless(text in "\\PC{0,300}", limit in 1usize..64) {
        let chunks = split_message(&text, limit);
        prop_assert_eq!(chunks.concat(), text.clone());

        let units = |s: &str| s.encode_utf16().count();
        for chunk in &chunks {
            prop_assert!(!chunk.is_empty());
            prop_assert!(units(chunk) <= limit || chunk.chars().count() == 1);
        }
        for pair in chunks.windows(2) {
            let next = pair[1].chars().next().map_or(0, char::len_utf16);
            prop_assert!(units(&pair[0]) + next > limit);
        }
    }
}
