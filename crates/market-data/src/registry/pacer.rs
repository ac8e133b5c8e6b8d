//! Minimum-delay pacing for quote providers.
//!
//! Keeps the time of the last call per provider and makes the next caller
//! wait until the provider's `min_delay` has elapsed.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// Per-provider pacing state.
#[derive(Debug, Default)]
pub struct Pacer {
    last_call: Mutex<HashMap<String, Instant>>,
}

impl Pacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// How long the caller must wait before calling `provider_id` again.
    pub fn time_until_ready(&self, provider_id: &str, min_delay: Duration) -> Duration {
        let guard = match self.last_call.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.get(provider_id) {
            Some(last) => min_delay.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Waits out the remaining delay, then records the call.
    pub async fn acquire(&self, provider_id: &str, min_delay: Duration) {
        let wait = self.time_until_ready(provider_id, min_delay);
        if !wait.is_zero() {
            debug!("Pacing {}: waiting {:?}", provider_id, wait);
            tokio::time::sleep(wait).await;
        }
        self.record(provider_id);
    }

    fn record(&self, provider_id: &str) {
        let mut guard = match self.last_call.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.insert(provider_id.to_string(), Instant::now());
    }
}
