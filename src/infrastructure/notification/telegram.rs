//! Telegram Bot API notification backend

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::ports::{
    declare_content_options, NotificationBackend, OptionRegistrar, OptionSpec, SendError,
};
use crate::domain::config::{DEFAULT_TELEGRAM_API_URL, DEFAULT_TELEGRAM_TIMEOUT_SECS};
use crate::domain::notification::{NotificationRecord, RecordField, DEFAULT_TITLE};

/// Method path appended after the bot token
const SEND_MESSAGE_PATH: &str = "/sendMessage";

/// User-Agent sent with every request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Environment variable for the bot token
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable for the destination chat
pub const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

// Error body returned by the Bot API:
// {"ok":false,"error_code":400,"description":"Bad Request: chat not found"}
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    description: Option<String>,
}

/// Backend that posts a text message through the Telegram Bot API
#[derive(Debug, Clone)]
pub struct TelegramBackend {
    api_base_url: String,
    timeout: Duration,
}

impl TelegramBackend {
    /// Create a backend targeting api.telegram.org with a 15 second timeout
    pub fn new() -> Self {
        Self {
            api_base_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TELEGRAM_TIMEOUT_SECS),
        }
    }

    /// Target a different Bot API server (self-hosted or a test stub)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the sendMessage endpoint for a token
    fn endpoint(&self, token: &str) -> String {
        format!("{}/bot{}{}", self.api_base_url, token, SEND_MESSAGE_PATH)
    }

    /// Compose the message text from the record.
    ///
    /// Title and body are joined by a newline; topic and image each follow
    /// as their own blank-line separated block.
    pub fn compose_message(record: &NotificationRecord) -> String {
        let mut message = String::new();

        if !record.payload.title.is_empty() {
            message.push_str(&record.payload.title);
        }

        if !record.payload.body.is_empty() {
            if !message.is_empty() {
                message.push('\n');
            }
            message.push_str(&record.payload.body);
        }

        if !record.topic.is_empty() {
            push_block(&mut message, &format!("Topic: {}", record.topic));
        }

        if !record.payload.image_url.is_empty() {
            push_block(&mut message, &format!("Image: {}", record.payload.image_url));
        }

        if message.is_empty() {
            message.push_str(DEFAULT_TITLE);
        }

        message
    }

    /// Fail fast when a credential is missing
    fn check_credentials(record: &NotificationRecord) -> Result<(), SendError> {
        let missing = match (record.bot_token.is_empty(), record.chat_id.is_empty()) {
            (false, false) => return Ok(()),
            (true, true) => "bot token and chat id",
            (true, false) => "bot token",
            (false, true) => "chat id",
        };
        Err(SendError::MissingCredentials { missing })
    }

    /// Build the HTTP client for a single send. Dropped when the send ends.
    fn build_client(&self) -> Result<reqwest::Client, SendError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SendError::TransportInitFailed(error_chain(&e)))
    }

    fn network_error(&self, e: reqwest::Error) -> SendError {
        if e.is_timeout() {
            return SendError::NetworkError(format!(
                "request timed out after {}s",
                self.timeout.as_secs()
            ));
        }
        // The URL carries the bot token
        SendError::NetworkError(error_chain(&e.without_url()))
    }
}

impl Default for TelegramBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn push_block(message: &mut String, block: &str) {
    if !message.is_empty() {
        message.push_str("\n\n");
    }
    message.push_str(block);
}

/// Render an error with its source chain, outermost first
fn error_chain(e: &dyn StdError) -> String {
    let mut text = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Read the response body. A failed read keeps whatever arrived and
/// appends the cause.
async fn read_body(mut response: reqwest::Response) -> (String, Option<String>) {
    let mut bytes = Vec::new();
    let failure = loop {
        match response.chunk().await {
            Ok(Some(chunk)) => bytes.extend_from_slice(&chunk),
            Ok(None) => break None,
            Err(e) => break Some(error_chain(&e.without_url())),
        }
    };
    (String::from_utf8_lossy(&bytes).into_owned(), failure)
}

/// Extract the Bot API `description`, falling back to the raw body
fn rejection_detail(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.description)
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl NotificationBackend for TelegramBackend {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn description(&self) -> &'static str {
        "Send notification through the Telegram Bot API"
    }

    fn declare_options(&self, registrar: &mut dyn OptionRegistrar) {
        declare_content_options(registrar);
        registrar.register(OptionSpec::credential(
            RecordField::BotToken,
            "bot-token",
            'k',
            "Telegram bot token",
            BOT_TOKEN_ENV,
        ));
        registrar.register(OptionSpec::credential(
            RecordField::ChatId,
            "chat-id",
            'c',
            "Destination chat id",
            CHAT_ID_ENV,
        ));
    }

    async fn send(&self, record: &NotificationRecord) -> Result<(), SendError> {
        Self::check_credentials(record)?;

        let client = self.build_client()?;
        let text = Self::compose_message(record);

        debug!(
            api = %self.api_base_url,
            chars = text.chars().count(),
            "posting sendMessage"
        );

        let response = client
            .post(self.endpoint(record.bot_token.expose()))
            .form(&[("chat_id", record.chat_id.expose()), ("text", text.as_str())])
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        let (mut body, read_failure) = read_body(response).await;

        debug!(status = status.as_u16(), "sendMessage returned");

        if let Some(cause) = read_failure {
            if status.is_success() {
                warn!(status = status.as_u16(), error = %cause, "sendMessage body unreadable");
            } else {
                if !body.trim().is_empty() {
                    body.push(' ');
                }
                body.push_str(&format!("<body unreadable: {}>", cause));
            }
        }

        if !status.is_success() {
            return Err(SendError::RemoteRejected {
                status: status.as_u16(),
                detail: rejection_detail(&body),
                body,
            });
        }

        Ok(())
    }
}
