//! Notification record and its identity types

mod id;
mod record;
mod secret;

pub use id::NotificationId;
pub use record::{NotificationRecord, Payload, RecordField, DEFAULT_TITLE};
pub use secret::Secret;
