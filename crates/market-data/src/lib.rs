//! foliobot Market Data Crate
//!
//! This crate fetches latest quotes for the holdings foliobot reports on.
//!
//! # Overview
//!
//! - Two quote sources: Naver Finance (screen-scrape, KRX listings) and the
//!   Yahoo Finance chart endpoint (JSON, US listings and FX pairs)
//! - One provider per [`QuoteSource`] behind the [`QuoteProvider`] trait
//! - Pacing between calls and a single retry for transient failures
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  Report Service  | --> | ProviderRegistry |  (pacing, single retry)
//! +------------------+     +------------------+
//!                                  |
//!                      +-----------+-----------+
//!                      v                       v
//!            +------------------+    +--------------------+
//!            |  NaverFinance    |    | YahooChartProvider |
//!            |  (HTML scrape)   |    |   (JSON API)       |
//!            +------------------+    +--------------------+
//!                      |                       |
//!                      +-----------+-----------+
//!                                  v
//!                          +------------------+
//!                          |      Quote       |
//!                          +------------------+
//! ```

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use errors::{MarketDataError, RetryClass};
pub use models::{Quote, QuoteSource};

pub use provider::naver::NaverFinanceProvider;
pub use provider::yahoo::YahooChartProvider;
pub use provider::{QuoteProvider, RateLimit, DEFAULT_REQUEST_TIMEOUT};

pub use registry::{Pacer, ProviderRegistry};
