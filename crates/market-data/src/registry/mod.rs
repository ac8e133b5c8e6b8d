//! Provider registry module.
//!
//! This module provides orchestration for quote providers:
//! - Routing a quote source to its provider
//! - Pacing successive calls to the same provider
//! - A single retry for transient failures

mod pacer;
mod registry;

pub use pacer::Pacer;
pub use registry::ProviderRegistry;
