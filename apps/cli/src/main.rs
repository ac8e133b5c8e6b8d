mod config;
mod main_lib;

use chrono::Utc;
use foliobot_core::RunOutcome;

use config::Config;
use main_lib::{build_service, init_tracing};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();
    let service = build_service(&config)?;

    match service.run(Utc::now()).await? {
        RunOutcome::MarketClosed { delivery } => {
            tracing::info!(
                "Market closed notice: {}/{} delivered",
                delivery.delivered,
                delivery.attempted
            );
        }
        RunOutcome::Reported(summary) => {
            let totals = &summary.valuation.totals;
            tracing::info!(
                "Report done: {} priced, {} unavailable, {}/{} parts delivered, snapshot saved: {}",
                totals.priced_count,
                totals.unavailable_count,
                summary.delivery.delivered,
                summary.delivery.attempted,
                summary.snapshot_saved
            );
        }
    }
    Ok(())
}
