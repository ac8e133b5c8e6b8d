//! Pacing configuration for quote providers.

use std::time::Duration;

/// Rate limiting configuration for a provider.
///
/// Controls how aggressively we call a provider so the upstream does not
/// start blocking us.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimit {
    /// Minimum delay between two successive requests to the provider.
    pub min_delay: Duration,

    /// Delay before the single retry of a transient failure.
    pub retry_delay: Duration,
}

impl RateLimit {
    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(250),
            retry_delay: Duration::from_secs(1),
        }
    }
}
