//! Notification record entity

use chrono::{DateTime, SubsecRound, Utc};

use super::{NotificationId, Secret};

/// Title used when the record carries none
pub const DEFAULT_TITLE: &str = "Notification";

/// User-visible content of a notification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub title: String,
    pub body: String,
    /// Icon reference for desktop notifiers, plain text for chat backends
    pub image_url: String,
}

/// One notification, built from command-line input and handed read-only to a
/// backend.
///
/// Empty strings mean "not provided". `id` and `created_at` stay unset until
/// [`NotificationRecord::stamp_with`] runs right before dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationRecord {
    pub id: Option<NotificationId>,
    pub topic: String,
    pub created_at: Option<DateTime<Utc>>,
    pub payload: Payload,
    pub bot_token: Secret,
    pub chat_id: Secret,
}

/// Record fields that configuration input can populate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Title,
    Body,
    Topic,
    ImageUrl,
    BotToken,
    ChatId,
}

impl NotificationRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a configuration value into the matching field
    pub fn assign(&mut self, field: RecordField, value: impl Into<String>) {
        let value = value.into();
        match field {
            RecordField::Title => self.payload.title = value,
            RecordField::Body => self.payload.body = value,
            RecordField::Topic => self.topic = value,
            RecordField::ImageUrl => self.payload.image_url = value,
            RecordField::BotToken => self.bot_token = Secret::new(value),
            RecordField::ChatId => self.chat_id = Secret::new(value),
        }
    }

    /// Set the identity fields. Sub-second precision is dropped.
    pub fn stamp_with(&mut self, id: NotificationId, created_at: DateTime<Utc>) {
        self.id = Some(id);
        self.created_at = Some(created_at.trunc_subsecs(0));
    }

    /// Creation time as seconds since the Unix epoch
    pub fn created_at_epoch(&self) -> Option<i64> {
        self.created_at.map(|at| at.timestamp())
    }

    /// Title, or [`DEFAULT_TITLE`] when empty
    pub fn title_or_default(&self) -> &str {
        if self.payload.title.is_empty() {
            DEFAULT_TITLE
        } else {
            &self.payload.title
        }
    }
}
