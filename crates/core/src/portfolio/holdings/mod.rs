mod holdings_model;
mod portfolio_config;

pub use holdings_model::*;
pub use portfolio_config::*;
