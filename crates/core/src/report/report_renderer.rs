use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::constants::{DISPLAY_PERCENT_PRECISION, DISPLAY_WEIGHT_PRECISION};
use crate::portfolio::valuation::{
    BucketValuation, HoldingStatus, HoldingValuation, PortfolioValuation, ValuationTotals,
};
use crate::utils::format_utils::{
    currency_decimals, format_amount, format_percent, format_signed_amount, format_weight,
    trend_marker,
};
use crate::utils::time_utils::format_report_timestamp;

const SECTION_RULE: &str = "────────────────";
const HOLDING_RULE: &str = "- - - - -";
const UNLABELED_BUCKET: &str = "Other";

/// Renders the full report for one run.
///
/// Layout: title, local timestamp, FX lines, then one section per bucket
/// and a grand summary. Per-bucket summaries are only shown when there is
/// more than one bucket.
pub fn render_report(valuation: &PortfolioValuation, tz: Tz) -> String {
    let base = valuation.base_currency.as_str();
    let mut lines: Vec<String> = vec![
        format!("📊 {}", valuation.title),
        format!("🕒 {}", format_report_timestamp(valuation.as_of, tz)),
    ];
    for (currency, rate) in &valuation.fx_rates {
        lines.push(format!(
            "💱 1 {} = {} {}",
            currency,
            format_amount(*rate, 2),
            base
        ));
    }
    lines.push(String::new());

    let multi_bucket = valuation.buckets.len() > 1;
    for bucket in &valuation.buckets {
        render_bucket(&mut lines, bucket, base, multi_bucket);
    }

    lines.push("📈 Total".to_string());
    render_totals(&mut lines, &valuation.totals, base);
    if valuation.totals.unavailable_count > 0 {
        lines.push(format!(
            "⚠️ {} holding(s) unavailable, excluded from totals",
            valuation.totals.unavailable_count
        ));
    }

    lines.join("\n")
}

/// Short notice sent instead of a report when the market is closed.
pub fn render_market_closed(title: &str, now: DateTime<Utc>, tz: Tz) -> String {
    [
        format!("📊 {}", title),
        format!("🕒 {}", format_report_timestamp(now, tz)),
        String::new(),
        "💤 Market closed today. No report.".to_string(),
    ]
    .join("\n")
}

fn render_bucket(lines: &mut Vec<String>, bucket: &BucketValuation, base: &str, multi_bucket: bool) {
    let label = bucket.label.as_deref().unwrap_or(UNLABELED_BUCKET);
    if bucket.label.is_some() || multi_bucket {
        lines.push(format!("📂 [{}]", label));
    }
    lines.push(SECTION_RULE.to_string());

    for holding in &bucket.holdings {
        render_holding(lines, holding, base);
        lines.push(HOLDING_RULE.to_string());
    }

    if multi_bucket {
        lines.push(format!("🧾 {} summary", label));
        render_totals(lines, &bucket.totals, base);
    }
    lines.push(String::new());
}

fn render_holding(lines: &mut Vec<String>, holding: &HoldingValuation, base: &str) {
    lines.push(format!("■ {} ({})", holding.name, holding.symbol));

    let priced = match &holding.status {
        HoldingStatus::Priced(priced) => priced,
        HoldingStatus::Unavailable { reason } => {
            lines.push(format!("⚠️ Price unavailable: {}", reason));
            return;
        }
    };

    let base_dp = currency_decimals(base);
    let price = &priced.price;
    let mut price_line = format!(
        "Price: {} {}",
        format_amount(price.native_price, currency_decimals(&price.currency)),
        price.currency
    );
    if price.currency != base {
        price_line.push_str(&format!(
            " (≈ {} {})",
            format_amount(price.base_price(), base_dp),
            base
        ));
    }
    if let Some(change) = price.change_percent {
        price_line.push_str(&format!(
            " {} {}",
            format_percent(Some(change), DISPLAY_PERCENT_PRECISION),
            trend_marker(change)
        ));
    }
    lines.push(price_line);

    lines.push(format!("Value: {} {}", format_amount(priced.market_value, base_dp), base));
    lines.push(format!(
        "Return: {} {}",
        format_percent(priced.return_percent, DISPLAY_PERCENT_PRECISION),
        trend_marker(priced.return_percent.unwrap_or(Decimal::ZERO))
    ));
    lines.push(signed_line("Profit", priced.profit, base, base_dp));
    lines.push(format!(
        "Weight: {}",
        format_weight(priced.weight_percent, DISPLAY_WEIGHT_PRECISION)
    ));
    lines.push(signed_line("Change", priced.delta, base, base_dp));
}

fn render_totals(lines: &mut Vec<String>, totals: &ValuationTotals, base: &str) {
    let dp = currency_decimals(base);
    lines.push(format!("Cost: {} {}", format_amount(totals.cost, dp), base));
    lines.push(format!("Value: {} {}", format_amount(totals.market_value, dp), base));
    lines.push(signed_line("Profit", totals.profit, base, dp));
    lines.push(format!(
        "Return: {} {}",
        format_percent(totals.return_percent, DISPLAY_PERCENT_PRECISION),
        trend_marker(totals.return_percent.unwrap_or(Decimal::ZERO))
    ));
    lines.push(signed_line("Change", totals.delta, base, dp));
}

fn signed_line(label: &str, value: Decimal, currency: &str, dp: u32) -> String {
    format!(
        "{}: {} {} {}",
        label,
        format_signed_amount(value, dp),
        currency,
        trend_marker(value)
    )
}
