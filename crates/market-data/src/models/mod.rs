//! Market data models
//!
//! This module contains the core data types for quote fetching:
//! - `types` - Quote source selector
//! - `quote` - The fetched quote (Quote)

mod quote;
mod types;

pub use quote::Quote;
pub use types::QuoteSource;
