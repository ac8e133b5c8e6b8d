//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteProvider` trait that all providers implement
//! - Pacing configuration (`RateLimit`)
//! - Concrete providers: Naver Finance (screen-scrape) and Yahoo chart (JSON API)

mod capabilities;
mod http;
mod traits;

pub mod naver;
pub mod yahoo;

// Re-exports
pub use capabilities::RateLimit;
pub use http::DEFAULT_REQUEST_TIMEOUT;
pub use traits::QuoteProvider;
