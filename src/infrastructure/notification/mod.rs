//! Notification backends
//!
//! The set of backends is fixed at compile time. [`Backend`] holds one
//! variant per sender and implements [`NotificationBackend`] by delegation.

mod notify_send;
mod telegram;

pub use notify_send::NotifySendBackend;
pub use telegram::{TelegramBackend, BOT_TOKEN_ENV, CHAT_ID_ENV};

use async_trait::async_trait;

use crate::application::ports::{NotificationBackend, OptionRegistrar, SendError};
use crate::domain::config::AppConfig;
use crate::domain::notification::NotificationRecord;

/// Every registered backend
#[derive(Debug, Clone)]
pub enum Backend {
    Local(NotifySendBackend),
    Telegram(TelegramBackend),
}

impl Backend {
    /// All backends configured from `config`, in subcommand order
    pub fn all(config: &AppConfig) -> Vec<Backend> {
        vec![
            Backend::Local(local_from(config)),
            Backend::Telegram(telegram_from(config)),
        ]
    }

    /// The same kind of backend, rebuilt with settings from `config`
    pub fn configured(self, config: &AppConfig) -> Backend {
        match self {
            Backend::Local(_) => Backend::Local(local_from(config)),
            Backend::Telegram(_) => Backend::Telegram(telegram_from(config)),
        }
    }

    /// Select the backend whose name matches
    pub fn find(backends: Vec<Backend>, name: &str) -> Option<Backend> {
        backends.into_iter().find(|b| b.name() == name)
    }
}

fn local_from(config: &AppConfig) -> NotifySendBackend {
    NotifySendBackend::with_binary(config.notifier_binary_or_default())
}

fn telegram_from(config: &AppConfig) -> TelegramBackend {
    TelegramBackend::new()
        .with_api_base_url(config.telegram_api_url_or_default())
        .with_timeout(config.telegram_timeout_or_default())
}

#[async_trait]
impl NotificationBackend for Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::Local(b) => b.name(),
            Backend::Telegram(b) => b.name(),
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Backend::Local(b) => b.description(),
            Backend::Telegram(b) => b.description(),
        }
    }

    fn declare_options(&self, registrar: &mut dyn OptionRegistrar) {
        match self {
            Backend::Local(b) => b.declare_options(registrar),
            Backend::Telegram(b) => b.declare_options(registrar),
        }
    }

    async fn send(&self, record: &NotificationRecord) -> Result<(), SendError> {
        match self {
            Backend::Local(b) => b.send(record).await,
            Backend::Telegram(b) => b.send(record).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    use crate::domain::config::{LocalConfig, TelegramConfig};

    #[test]
    fn backend_names_are_unique() {
        let backends = Backend::all(&AppConfig::defaults());
        let names: HashSet<&str> = backends.iter().map(|b| b.name()).collect();
        assert_eq!(names.len(), backends.len());
    }

    #[test]
    fn registered_in_subcommand_order() {
        let names: Vec<&str> = Backend::all(&AppConfig::defaults())
            .iter()
            .map(|b| b.name())
            .collect();
        assert_eq!(names, ["local", "telegram"]);
    }

    #[test]
    fn find_selects_by_name() {
        let backends = Backend::all(&AppConfig::defaults());
        let found = Backend::find(backends, "telegram").unwrap();
        assert!(matches!(found, Backend::Telegram(_)));
    }

    #[test]
    fn find_unknown_name_is_none() {
        let backends = Backend::all(&AppConfig::defaults());
        assert!(Backend::find(backends, "fcm").is_none());
    }

    #[test]
    fn config_reaches_backends() {
        let config = AppConfig {
            local: Some(LocalConfig {
                binary: Some("/usr/bin/true".to_string()),
            }),
            telegram: Some(TelegramConfig {
                api_base_url: None,
                timeout_secs: Some(3),
            }),
        };

        let backends = Backend::all(&config);

        match &backends[0] {
            Backend::Local(b) => {
                let args = b.build_arguments(&NotificationRecord::new());
                assert_eq!(args[0], "/usr/bin/true");
            }
            other => panic!("Expected local backend, got {:?}", other),
        }
        match &backends[1] {
            Backend::Telegram(b) => assert_eq!(b.timeout(), Duration::from_secs(3)),
            other => panic!("Expected telegram backend, got {:?}", other),
        }
    }

    #[test]
    fn configured_keeps_kind_and_applies_settings() {
        let config = AppConfig {
            local: None,
            telegram: Some(TelegramConfig {
                api_base_url: None,
                timeout_secs: Some(9),
            }),
        };

        let defaults = Backend::all(&AppConfig::defaults());
        let rebuilt: Vec<Backend> = defaults
            .into_iter()
            .map(|b| b.configured(&config))
            .collect();

        let names: Vec<&str> = rebuilt.iter().map(|b| b.name()).collect();
        assert_eq!(names, ["local", "telegram"]);
        match &rebuilt[1] {
            Backend::Telegram(b) => assert_eq!(b.timeout(), Duration::from_secs(9)),
            other => panic!("Expected telegram backend, got {:?}", other),
        }
    }
}
