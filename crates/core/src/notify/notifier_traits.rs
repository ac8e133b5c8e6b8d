use std::path::Path;

use async_trait::async_trait;

/// Outcome of a delivery attempt. One message chunk or one photo counts
/// as one attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failures: Vec<String>,
}

impl DeliveryReport {
    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.delivered += 1;
    }

    pub fn record_failure(&mut self, reason: impl Into<String>) {
        self.attempted += 1;
        self.failures.push(reason.into());
    }

    pub fn merge(&mut self, other: DeliveryReport) {
        self.attempted += other.attempted;
        self.delivered += other.delivered;
        self.failures.extend(other.failures);
    }

    /// True when every attempt was delivered.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.attempted == self.delivered
    }
}

/// A destination for rendered reports.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn id(&self) -> &'static str;

    /// Sends `text`, split into chunks the destination accepts, in order.
    async fn send_text(&self, text: &str) -> DeliveryReport;

    /// Sends an image file with a caption.
    async fn send_photo(&self, path: &Path, caption: &str) -> DeliveryReport;
}
