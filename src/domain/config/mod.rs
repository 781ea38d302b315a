//! Configuration domain types

mod app_config;

pub use app_config::{
    AppConfig, LocalConfig, TelegramConfig, DEFAULT_NOTIFIER_BINARY, DEFAULT_TELEGRAM_API_URL,
    DEFAULT_TELEGRAM_TIMEOUT_SECS,
};
