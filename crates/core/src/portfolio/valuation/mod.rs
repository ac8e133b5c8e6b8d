//! Portfolio valuation: per-holding profit/return/weight/delta and
//! per-account and grand totals.

pub mod valuation_calculator;
mod valuation_model;


pub use valuation_calculator::*;
pub use valuation_model::*;
