//! notify-send desktop notification backend

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::{
    declare_content_options, ExitReason, NotificationBackend, OptionRegistrar, SendError,
};
use crate::domain::config::DEFAULT_NOTIFIER_BINARY;
use crate::domain::notification::NotificationRecord;

/// Whether this platform ships a freedesktop notification daemon
const PLATFORM_SUPPORTED: bool = cfg!(all(unix, not(target_os = "macos")));

/// Desktop backend that shells out to `notify-send`
#[derive(Debug, Clone)]
pub struct NotifySendBackend {
    /// Notifier program, looked up on PATH unless it is a path
    binary: String,
    platform_supported: bool,
}

impl NotifySendBackend {
    /// Create a backend that runs `notify-send`
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_NOTIFIER_BINARY)
    }

    /// Create with a custom notifier program
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            platform_supported: PLATFORM_SUPPORTED,
        }
    }

    #[cfg(test)]
    fn without_platform_support(mut self) -> Self {
        self.platform_supported = false;
        self
    }

    /// Build the full argument vector, program name first.
    pub fn build_arguments(&self, record: &NotificationRecord) -> Vec<String> {
        let mut args = Vec::with_capacity(10);
        args.push(self.binary.clone());

        if !record.topic.is_empty() {
            args.push("--app-name".to_string());
            args.push(record.topic.clone());
            args.push("--category".to_string());
            args.push(record.topic.clone());
            args.push(format!("--hint=string:topic:{}", record.topic));
        }

        if let Some(id) = record.id {
            args.push(format!("--hint=string:notification-id:{}", id));
        }

        if let Some(created_at) = record.created_at_epoch().filter(|secs| *secs != 0) {
            args.push(format!("--hint=int:created-at:{}", created_at));
        }

        if !record.payload.image_url.is_empty() {
            args.push("--icon".to_string());
            args.push(record.payload.image_url.clone());
        }

        args.push(record.title_or_default().to_string());

        if !record.payload.body.is_empty() {
            args.push(record.payload.body.clone());
        }

        args
    }

    /// Run the notifier with the prepared arguments and wait for it to exit
    async fn execute(&self, args: &[String]) -> Result<(), SendError> {
        let Some((program, rest)) = args.split_first() else {
            return Err(SendError::SpawnFailed {
                program: self.binary.clone(),
                message: "empty argument list".to_string(),
            });
        };

        debug!(program = %program, args = rest.len(), "spawning notifier");

        let output = Command::new(program)
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| SendError::SpawnFailed {
                program: program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(SendError::ExternalToolFailed {
                program: program.clone(),
                reason: exit_reason(output.status),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

impl Default for NotifySendBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn exit_reason(status: ExitStatus) -> ExitReason {
    if let Some(code) = status.code() {
        return ExitReason::Code(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ExitReason::Signal(signal);
        }
    }

    ExitReason::Unknown
}

#[async_trait]
impl NotificationBackend for NotifySendBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    fn description(&self) -> &'static str {
        "Send notification using notify-send on Linux"
    }

    fn declare_options(&self, registrar: &mut dyn OptionRegistrar) {
        declare_content_options(registrar);
    }

    async fn send(&self, record: &NotificationRecord) -> Result<(), SendError> {
        if !self.platform_supported {
            return Err(SendError::UnsupportedPlatform {
                backend: self.name(),
            });
        }

        let args = self.build_arguments(record);
        self.execute(&args).await
    }
}
