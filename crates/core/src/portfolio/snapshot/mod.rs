//! Per-holding valuation snapshot, used to compute change since the last run.

mod snapshot_model;
mod snapshot_store;

pub use snapshot_model::*;
pub use snapshot_store::*;
