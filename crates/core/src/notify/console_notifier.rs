use std::path::Path;

use async_trait::async_trait;

use super::{split_message, DeliveryReport, Notifier};

/// Prints reports to stdout. Used for dry runs.
pub struct ConsoleNotifier {
    chunk_limit: usize,
}

impl ConsoleNotifier {
    pub fn new(chunk_limit: usize) -> Self {
        Self { chunk_limit }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn id(&self) -> &'static str {
        "CONSOLE"
    }

    async fn send_text(&self, text: &str) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for chunk in split_message(text, self.chunk_limit) {
            println!("{}", chunk);
            report.record_success();
        }
        report
    }

    async fn send_photo(&self, path: &Path, caption: &str) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        if path.exists() {
            println!("[photo] {} ({})", path.display(), caption);
            report.record_success();
        } else {
            report.record_failure(format!("photo not found: {}", path.display()));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_counts_chunks() {
        let notifier = ConsoleNotifier::new(3);
        let report = notifier.send_text("abcdefg").await;
        assert_eq!(report.attempted, 3);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_console_missing_photo_is_reported() {
        let notifier = ConsoleNotifier::new(4000);
        let report = notifier
            .send_photo(Path::new("/nonexistent/chart.png"), "caption")
            .await;
        assert_eq!(report.failures.len(), 1);
    }
}
