//! Application configuration value object

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default desktop notifier program
pub const DEFAULT_NOTIFIER_BINARY: &str = "notify-send";

/// Default Telegram Bot API base URL
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Default upper bound for one Bot API call
pub const DEFAULT_TELEGRAM_TIMEOUT_SECS: u64 = 15;

/// Local desktop backend configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalConfig {
    pub binary: Option<String>,
}

/// Telegram backend configuration. Credentials are never stored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub local: Option<LocalConfig>,
    pub telegram: Option<TelegramConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            local: Some(LocalConfig {
                binary: Some(DEFAULT_NOTIFIER_BINARY.to_string()),
            }),
            telegram: Some(TelegramConfig {
                api_base_url: Some(DEFAULT_TELEGRAM_API_URL.to_string()),
                timeout_secs: Some(DEFAULT_TELEGRAM_TIMEOUT_SECS),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            local: match (self.local, other.local) {
                (Some(b), Some(o)) => Some(LocalConfig {
                    binary: o.binary.or(b.binary),
                }),
                (b, o) => o.or(b),
            },
            telegram: match (self.telegram, other.telegram) {
                (Some(b), Some(o)) => Some(TelegramConfig {
                    api_base_url: o.api_base_url.or(b.api_base_url),
                    timeout_secs: o.timeout_secs.or(b.timeout_secs),
                }),
                (b, o) => o.or(b),
            },
        }
    }

    /// Get the notifier program, or "notify-send" if not set
    pub fn notifier_binary_or_default(&self) -> &str {
        self.local
            .as_ref()
            .and_then(|l| l.binary.as_deref())
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_NOTIFIER_BINARY)
    }

    /// Get the Bot API base URL without a trailing slash
    pub fn telegram_api_url_or_default(&self) -> &str {
        self.telegram
            .as_ref()
            .and_then(|t| t.api_base_url.as_deref())
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_TELEGRAM_API_URL)
    }

    /// Get the Bot API call timeout, or 15 seconds if not set or zero
    pub fn telegram_timeout_or_default(&self) -> Duration {
        let secs = self
            .telegram
            .as_ref()
            .and_then(|t| t.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TELEGRAM_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }
}
