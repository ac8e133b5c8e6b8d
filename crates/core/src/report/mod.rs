//! Report rendering, the market watchlist section, and the run that produces and delivers it.

mod market_summary;
mod report_renderer;
mod report_service;

pub use market_summary::*;
pub use report_renderer::*;
pub use report_service::*;
