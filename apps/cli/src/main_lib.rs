use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use foliobot_core::notify::{ConsoleNotifier, Notifier, TelegramConfig, TelegramNotifier};
use foliobot_core::portfolio::{JsonFileSnapshotStore, PortfolioConfig, SnapshotStore};
use foliobot_core::{ReportService, RunOptions};
use foliobot_market_data::{NaverFinanceProvider, ProviderRegistry, QuoteProvider, YahooChartProvider};

use crate::config::Config;

pub fn init_tracing() {
    let log_format = std::env::var("FOLIO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    match (&config.telegram, config.dry_run) {
        (Some(credentials), false) => {
            let mut telegram = TelegramConfig::new(&credentials.bot_token, &credentials.chat_id);
            telegram.api_base = config.telegram_api_base.clone();
            telegram.chunk_limit = config.chunk_limit;
            telegram.timeout = config.http_timeout;
            Arc::new(TelegramNotifier::new(telegram))
        }
        _ => {
            tracing::info!("Dry run: report goes to stdout, snapshot is not saved");
            Arc::new(ConsoleNotifier::new(config.chunk_limit))
        }
    }
}

pub fn build_service(config: &Config) -> anyhow::Result<ReportService> {
    let portfolio = PortfolioConfig::load(&config.portfolio_file).with_context(|| {
        format!(
            "Failed to load portfolio from {}",
            config.portfolio_file.display()
        )
    })?;
    tracing::info!(
        "Portfolio '{}': {} holdings, snapshot at {}",
        portfolio.title,
        portfolio.holdings.len(),
        config.snapshot_file.display()
    );

    let providers: Vec<Arc<dyn QuoteProvider>> = vec![
        Arc::new(NaverFinanceProvider::new(config.http_timeout)),
        Arc::new(YahooChartProvider::new(config.http_timeout)),
    ];
    let mut registry = ProviderRegistry::new(providers);
    if let Some(delay) = config.request_delay {
        registry = registry.with_min_delay(delay);
    }

    let snapshot_store: Arc<dyn SnapshotStore> =
        Arc::new(JsonFileSnapshotStore::new(config.snapshot_file.clone()));

    let service = ReportService::new(
        portfolio,
        Arc::new(registry),
        snapshot_store,
        build_notifier(config),
    )?
    .with_options(RunOptions {
        persist_snapshot: !config.dry_run,
        photo_path: config.photo_path.clone(),
    });
    Ok(service)
}
