//! Dispatch notification use case

use chrono::Utc;
use tracing::debug;

use crate::domain::notification::{NotificationId, NotificationRecord};

use super::ports::{NotificationBackend, SendError};

/// Output from a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutput {
    /// Identifier generated for this notification
    pub id: NotificationId,
    /// Name of the backend that delivered it
    pub backend: &'static str,
}

/// Callbacks for status updates around the send
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct DispatchCallbacks {
    /// Called once the record is stamped, before sending
    pub on_ready: Option<Box<dyn Fn(&NotificationRecord) + Send + Sync>>,
    /// Called right before the backend is invoked, with its name
    pub on_sending_start: Option<Box<dyn Fn(&str) + Send + Sync>>,
    /// Called after the backend returns, with its result
    pub on_sending_end: Option<Box<dyn Fn(&Result<(), SendError>) + Send + Sync>>,
}

/// Sends one populated record through one selected backend
pub struct DispatchNotificationUseCase<'a, B>
where
    B: NotificationBackend,
{
    backend: &'a B,
}

impl<'a, B> DispatchNotificationUseCase<'a, B>
where
    B: NotificationBackend,
{
    /// Create a new use case instance
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Stamp the record with a fresh id and creation time, then send it
    /// exactly once.
    pub async fn execute(
        &self,
        mut record: NotificationRecord,
        callbacks: DispatchCallbacks,
    ) -> Result<DispatchOutput, SendError> {
        let id = NotificationId::generate();
        record.stamp_with(id, Utc::now());

        debug!(backend = self.backend.name(), %id, "dispatching notification");

        if let Some(ref cb) = callbacks.on_ready {
            cb(&record);
        }
        if let Some(ref cb) = callbacks.on_sending_start {
            cb(self.backend.name());
        }

        let result = self.backend.send(&record).await;

        if let Some(ref cb) = callbacks.on_sending_end {
            cb(&result);
        }

        result.map(|()| DispatchOutput {
            id,
            backend: self.backend.name(),
        })
    }
}
