use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::time::Duration;
use teloxide::types::UserId;
use url::Url;

use crate::core::error::ConfigError;

/// Content document path
/// Read from DATA_FILE environment variable
/// Default: data.json
pub static DATA_FILE: Lazy<String> = Lazy::new(|| env::var("DATA_FILE").unwrap_or_else(|_| "data.json".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Default port for the webhook listener (Render assigns PORT, falls back to this)
pub const DEFAULT_PORT: u16 = 10000;

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Retry configuration
pub mod retry {
    use super::Duration;

    /// Maximum number of retries for dispatcher reconnection
    pub const MAX_DISPATCHER_RETRIES: u32 = 5;

    /// Delay between dispatcher retry attempts (in seconds)
    pub const DISPATCHER_RETRY_DELAY_SECS: u64 = 5;

    /// Dispatcher retry delay duration
    pub fn dispatcher_delay() -> Duration {
        Duration::from_secs(DISPATCHER_RETRY_DELAY_SECS)
    }
}

/// Required process configuration for running the bot.
///
/// Built once at startup; a missing token or admin id is fatal.
#[derive(Debug)]
pub struct BotConfig {
    /// Bot API token (BOT_TOKEN, falls back to TELOXIDE_TOKEN)
    pub token: SecretString,
    /// The single administrator allowed to edit content (ADMIN_ID)
    pub admin_id: UserId,
    /// Public base URL for webhook mode (WEBHOOK_URL)
    pub webhook_url: Option<Url>,
    /// Local port for the webhook listener (PORT)
    pub port: u16,
}

impl BotConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = get("BOT_TOKEN")
            .or_else(|| get("TELOXIDE_TOKEN"))
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let raw_admin = get("ADMIN_ID").ok_or(ConfigError::Missing("ADMIN_ID"))?;
        let admin_id = raw_admin.parse::<u64>().map_err(|e| ConfigError::Invalid {
            name: "ADMIN_ID",
            value: raw_admin.clone(),
            reason: e.to_string(),
        })?;
        if admin_id == 0 {
            return Err(ConfigError::Invalid {
                name: "ADMIN_ID",
                value: raw_admin,
                reason: "must be a Telegram user id, not 0".to_string(),
            });
        }

        let webhook_url = get("WEBHOOK_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                    name: "WEBHOOK_URL",
                    value: raw.clone(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            token: SecretString::from(token),
            admin_id: UserId(admin_id),
            webhook_url,
            port,
        })
    }

    /// Webhook endpoint the Bot API should post updates to.
    ///
    /// The token is the last path segment so the route is not guessable.
    pub fn webhook_endpoint(&self) -> Option<Result<Url, url::ParseError>> {
        self.webhook_url.as_ref().map(|base| {
            let base = base.as_str().trim_end_matches('/');
            Url::parse(&format!("{}/{}", base, self.token.expose_secret()))
        })
    }
}
