//! foliobot Core - portfolio valuation, snapshot diffing and report delivery.
//!
//! This crate holds the domain logic. Quote fetching lives in
//! `foliobot-market-data`; process setup (environment, logging) lives in
//! the `foliobot` binary.

pub mod constants;
pub mod errors;
pub mod notify;
pub mod portfolio;
pub mod report;
pub mod utils;

pub use portfolio::*;
pub use report::{ReportService, RunOptions, RunOutcome, RunSummary};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
