//! Telegram Bot API sink.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use super::{split_message, DeliveryReport, Notifier};
use crate::constants::{DEFAULT_CHUNK_LIMIT, PHOTO_CAPTION_LIMIT};

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub api_base: String,
    pub bot_token: String,
    pub chat_id: String,
    pub chunk_limit: usize,
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            chunk_limit: DEFAULT_CHUNK_LIMIT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Envelope returned by every Bot API method.
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }

    /// Method URL. Never log it: it embeds the bot token.
    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token,
            method
        )
    }

    async fn send_chunk(&self, chunk: &str) -> Result<(), String> {
        let params = [
            ("chat_id", self.config.chat_id.as_str()),
            ("text", chunk),
            ("disable_web_page_preview", "true"),
        ];
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .form(&params)
            .send()
            .await
            .map_err(|e| format!("sendMessage request failed: {}", e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("sendMessage response unreadable: {}", e.without_url()))?;
        interpret_response(status, &body)
    }

    async fn upload_photo(&self, path: &Path, caption: &str) -> Result<(), String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| format!("cannot read photo {}: {}", path.display(), e))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());

        let form = Form::new()
            .text("chat_id", self.config.chat_id.clone())
            .text("caption", truncate_utf16(caption, PHOTO_CAPTION_LIMIT))
            .part("photo", Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("sendPhoto request failed: {}", e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("sendPhoto response unreadable: {}", e.without_url()))?;
        interpret_response(status, &body)
    }
}

/// Maps an HTTP status and Bot API envelope to success or a failure reason.
fn interpret_response(status: reqwest::StatusCode, body: &str) -> Result<(), String> {
    let parsed: Option<TelegramResponse> = serde_json::from_str(body).ok();
    match parsed {
        Some(envelope) if status.is_success() && envelope.ok => Ok(()),
        Some(envelope) => Err(format!(
            "HTTP {}: {}",
            status.as_u16(),
            envelope
                .description
                .unwrap_or_else(|| "no description".to_string())
        )),
        None if status.is_success() => Err("unexpected response body".to_string()),
        None => Err(format!("HTTP {}", status.as_u16())),
    }
}

fn truncate_utf16(text: &str, limit: usize) -> String {
    split_message(text, limit).into_iter().next().unwrap_or_default()
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn id(&self) -> &'static str {
        "TELEGRAM"
    }

    async fn send_text(&self, text: &str) -> DeliveryReport {
        let chunks = split_message(text, self.config.chunk_limit);
        let total = chunks.len();
        let mut report = DeliveryReport::default();

        for (index, chunk) in chunks.iter().enumerate() {
            match self.send_chunk(chunk).await {
                Ok(()) => {
                    debug!("Delivered chunk {}/{}", index + 1, total);
                    report.record_success();
                }
                Err(reason) => {
                    error!("Failed to deliver chunk {}/{}: {}", index + 1, total, reason);
                    report.record_failure(reason);
                }
            }
        }

        info!(
            "Telegram text delivery: {}/{} chunks delivered",
            report.delivered, report.attempted
        );
        report
    }

    async fn send_photo(&self, path: &Path, caption: &str) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        match self.upload_photo(path, caption).await {
            Ok(()) => {
                info!("Delivered photo {}", path.display());
                report.record_success();
            }
            Err(reason) => {
                error!("Failed to deliver photo {}: {}", path.display(), reason);
                report.record_failure(reason);
            }
        }
        report
    }
}
