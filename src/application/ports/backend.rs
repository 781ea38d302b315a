//! Notification backend port interface

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::notification::{NotificationRecord, RecordField};

/// How an external notifier process ended abnormally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Exited with a nonzero status code
    Code(i32),
    /// Terminated by a signal
    Signal(i32),
    /// Platform reported neither a code nor a signal
    Unknown,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "with status {}", code),
            Self::Signal(signal) => write!(f, "due to signal {}", signal),
            Self::Unknown => write!(f, "for an unknown reason"),
        }
    }
}

/// Delivery errors. None of these terminate the process.
#[derive(Debug, Clone, Error)]
pub enum SendError {
    #[error("{backend} backend is unavailable on this platform")]
    UnsupportedPlatform { backend: &'static str },

    #[error("Failed to start {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("{} exited abnormally {}{}", .program, .reason, stderr_suffix(.stderr))]
    ExternalToolFailed {
        program: String,
        reason: ExitReason,
        stderr: String,
    },

    #[error("Missing credentials: {missing} must be provided")]
    MissingCredentials { missing: &'static str },

    #[error("Failed to initialize HTTP transport: {0}")]
    TransportInitFailed(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Remote API rejected the request with HTTP {}{}", .status, body_suffix(.detail))]
    RemoteRejected {
        status: u16,
        body: String,
        /// Human-readable reason extracted from the body, if any
        detail: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

fn body_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {}", detail)
    }
}

/// A single configuration input a backend needs from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    /// Record field the value is written into
    pub field: RecordField,
    pub long: &'static str,
    pub short: char,
    pub help: &'static str,
    pub required: bool,
    /// Environment variable consulted when the flag is absent
    pub env: Option<&'static str>,
    /// Value must never be echoed (help output, summaries, logs)
    pub sensitive: bool,
}

impl OptionSpec {
    /// A required plain option
    pub const fn required(
        field: RecordField,
        long: &'static str,
        short: char,
        help: &'static str,
    ) -> Self {
        Self {
            field,
            long,
            short,
            help,
            required: true,
            env: None,
            sensitive: false,
        }
    }

    /// An optional plain option
    pub const fn optional(
        field: RecordField,
        long: &'static str,
        short: char,
        help: &'static str,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(field, long, short, help)
        }
    }

    /// A required credential, also read from `env`
    pub const fn credential(
        field: RecordField,
        long: &'static str,
        short: char,
        help: &'static str,
        env: &'static str,
    ) -> Self {
        Self {
            env: Some(env),
            sensitive: true,
            ..Self::required(field, long, short, help)
        }
    }
}

/// Surface a backend declares its configuration inputs against.
///
/// The registrar owns parsing; once input is available it writes each
/// declared option's value into the record via [`NotificationRecord::assign`].
pub trait OptionRegistrar {
    fn register(&mut self, option: OptionSpec);
}

impl OptionRegistrar for Vec<OptionSpec> {
    fn register(&mut self, option: OptionSpec) {
        self.push(option);
    }
}

/// Options shared by every backend: title, body, topic and image URL
pub fn declare_content_options(registrar: &mut dyn OptionRegistrar) {
    registrar.register(OptionSpec::required(
        RecordField::Title,
        "title",
        't',
        "Notification title",
    ));
    registrar.register(OptionSpec::required(
        RecordField::Body,
        "body",
        'b',
        "Notification body",
    ));
    registrar.register(OptionSpec::optional(
        RecordField::Topic,
        "topic",
        'p',
        "Topic or category label",
    ));
    registrar.register(OptionSpec::optional(
        RecordField::ImageUrl,
        "image-url",
        'i',
        "Image URL (icon for desktop, text for chat)",
    ));
}

/// Port for notification delivery backends
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Unique name, used as the subcommand token
    fn name(&self) -> &'static str;

    /// One-line summary for help output
    fn description(&self) -> &'static str;

    /// Register the configuration inputs this backend needs.
    fn declare_options(&self, registrar: &mut dyn OptionRegistrar);

    /// Deliver the notification.
    ///
    /// # Arguments
    /// * `record` - The stamped notification, read-only
    ///
    /// # Returns
    /// Ok(()) on confirmed delivery, a [`SendError`] otherwise
    async fn send(&self, record: &NotificationRecord) -> Result<(), SendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_options_declare_title_body_topic_image() {
        let mut specs: Vec<OptionSpec> = Vec::new();
        declare_content_options(&mut specs);

        let longs: Vec<&str> = specs.iter().map(|s| s.long).collect();
        assert_eq!(longs, ["title", "body", "topic", "image-url"]);
        let shorts: Vec<char> = specs.iter().map(|s| s.short).collect();
        assert_eq!(shorts, ['t', 'b', 'p', 'i']);
        assert!(specs[0].required && specs[1].required);
        assert!(!specs[2].required && !specs[3].required);
        assert!(specs.iter().all(|s| !s.sensitive));
    }

    #[test]
    fn credential_spec_is_required_and_sensitive() {
        let spec = OptionSpec::credential(
            RecordField::BotToken,
            "bot-token",
            'k',
            "Bot token",
            "TELEGRAM_BOT_TOKEN",
        );
        assert!(spec.required);
        assert!(spec.sensitive);
        assert_eq!(spec.env, Some("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn external_tool_failure_mentions_code() {
        let err = SendError::ExternalToolFailed {
            program: "notify-send".to_string(),
            reason: ExitReason::Code(1),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "notify-send exited abnormally with status 1");
    }

    #[test]
    fn unsupported_platform_names_backend() {
        let err = SendError::UnsupportedPlatform { backend: "local" };
        assert_eq!(
            err.to_string(),
            "local backend is unavailable on this platform"
        );
    }

    #[test]
    fn transport_init_failure_carries_cause() {
        let err = SendError::TransportInitFailed("no TLS backend available".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to initialize HTTP transport: no TLS backend available"
        );
    }

    #[test]
    fn external_tool_failure_mentions_signal_and_stderr() {
        let err = SendError::ExternalToolFailed {
            program: "notify-send".to_string(),
            reason: ExitReason::Signal(9),
            stderr: "killed\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "notify-send exited abnormally due to signal 9: killed"
        );
    }

    #[test]
    fn remote_rejection_mentions_status_and_detail() {
        let err = SendError::RemoteRejected {
            status: 400,
            body: "{}".to_string(),
            detail: "Bad Request: chat not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Remote API rejected the request with HTTP 400: Bad Request: chat not found"
        );
    }

    #[test]
    fn remote_rejection_without_body() {
        let err = SendError::RemoteRejected {
            status: 502,
            body: String::new(),
            detail: String::new(),
        };
        assert_eq!(err.to_string(), "Remote API rejected the request with HTTP 502");
    }
}
