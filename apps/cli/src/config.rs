use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use foliobot_core::constants::DEFAULT_CHUNK_LIMIT;
use foliobot_core::notify::DEFAULT_TELEGRAM_API_BASE;

pub const ENV_BOT_TOKEN: &str = "FOLIO_BOT_TOKEN";
pub const ENV_CHAT_ID: &str = "FOLIO_CHAT_ID";
pub const ENV_PORTFOLIO_FILE: &str = "FOLIO_PORTFOLIO_FILE";
pub const ENV_SNAPSHOT_FILE: &str = "FOLIO_SNAPSHOT_FILE";
pub const ENV_HTTP_TIMEOUT_MS: &str = "FOLIO_HTTP_TIMEOUT_MS";
pub const ENV_REQUEST_DELAY_MS: &str = "FOLIO_REQUEST_DELAY_MS";
pub const ENV_CHUNK_LIMIT: &str = "FOLIO_CHUNK_LIMIT";
pub const ENV_TELEGRAM_API_BASE: &str = "FOLIO_TELEGRAM_API_BASE";
pub const ENV_PHOTO_PATH: &str = "FOLIO_PHOTO_PATH";
pub const ENV_DRY_RUN: &str = "FOLIO_DRY_RUN";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` only for dry runs
    pub telegram: Option<TelegramCredentials>,
    pub telegram_api_base: String,
    pub portfolio_file: PathBuf,
    pub snapshot_file: PathBuf,
    pub http_timeout: Duration,
    /// Overrides each provider's own pacing when set
    pub request_delay: Option<Duration>,
    pub chunk_limit: usize,
    pub photo_path: Option<PathBuf>,
    pub dry_run: bool,
}

impl Config {
    /// Reads configuration from the process environment, after loading a
    /// `.env` file if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let dry_run = match get(ENV_DRY_RUN) {
            Some(value) => parse_bool(ENV_DRY_RUN, &value)?,
            None => false,
        };

        let telegram = match (get(ENV_BOT_TOKEN), get(ENV_CHAT_ID)) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramCredentials { bot_token, chat_id }),
            _ if dry_run => None,
            (None, _) => return Err(ConfigError::Missing(ENV_BOT_TOKEN)),
            (_, None) => return Err(ConfigError::Missing(ENV_CHAT_ID)),
        };

        let http_timeout = Duration::from_millis(match get(ENV_HTTP_TIMEOUT_MS) {
            Some(value) => parse_number(ENV_HTTP_TIMEOUT_MS, &value)?,
            None => 10_000,
        });
        let request_delay = get(ENV_REQUEST_DELAY_MS)
            .map(|value| parse_number(ENV_REQUEST_DELAY_MS, &value).map(Duration::from_millis))
            .transpose()?;
        let chunk_limit = match get(ENV_CHUNK_LIMIT) {
            Some(value) => match parse_number(ENV_CHUNK_LIMIT, &value)? {
                0 => {
                    return Err(ConfigError::Invalid {
                        key: ENV_CHUNK_LIMIT,
                        value,
                    })
                }
                n => n as usize,
            },
            None => DEFAULT_CHUNK_LIMIT,
        };

        Ok(Self {
            telegram,
            telegram_api_base: get(ENV_TELEGRAM_API_BASE)
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
            portfolio_file: get(ENV_PORTFOLIO_FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("portfolio.json")),
            snapshot_file: get(ENV_SNAPSHOT_FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/last_snapshot.json")),
            http_timeout,
            request_delay,
            chunk_limit,
            photo_path: get(ENV_PHOTO_PATH).map(PathBuf::from),
            dry_run,
        })
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}
