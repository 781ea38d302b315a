//! Main app runner

use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use indicatif::ProgressBar;
use tracing::warn;

use crate::application::ports::{ConfigStore, NotificationBackend, SendError};
use crate::application::{DispatchCallbacks, DispatchNotificationUseCase, DispatchOutput};
use crate::domain::config::AppConfig;
use crate::domain::notification::NotificationRecord;
use crate::infrastructure::{Backend, XdgConfigStore};

use super::args::parse_invocation;
use super::logging;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Parse the command line and send one notification.
///
/// Delivery failures are reported on stderr but still exit with
/// [`EXIT_SUCCESS`]; only usage errors change the exit code.
pub async fn run<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let presenter = Presenter::new();

    // The command line shape does not depend on the config file
    let invocation = match parse_invocation(Backend::all(&AppConfig::defaults()), args) {
        Ok(invocation) => invocation,
        Err(e) => {
            // --help and --version land here too, with exit code 0
            let _ = e.print();
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(EXIT_USAGE_ERROR));
        }
    };

    logging::init(invocation.global.verbose);

    let config = load_config(&XdgConfigStore::new(), &presenter).await;
    let backend = invocation.backend.configured(&config);

    let _ = dispatch(&backend, invocation.record, &presenter).await;

    ExitCode::from(EXIT_SUCCESS)
}

/// Send the record through the backend, reporting progress and the outcome.
pub async fn dispatch(
    backend: &Backend,
    record: NotificationRecord,
    presenter: &Presenter,
) -> Result<DispatchOutput, SendError> {
    let spinner: Arc<Mutex<Option<ProgressBar>>> = Arc::default();
    let started = Arc::clone(&spinner);
    let finished = Arc::clone(&spinner);

    let callbacks = DispatchCallbacks {
        on_ready: Some(Box::new(Presenter::print_details)),
        on_sending_start: Some(Box::new(move |name: &str| {
            if let Ok(mut slot) = started.lock() {
                *slot = Some(Presenter::start_spinner(&format!("Sending via {}...", name)));
            }
        })),
        on_sending_end: Some(Box::new(move |_: &Result<(), SendError>| {
            if let Some(bar) = finished.lock().ok().and_then(|mut slot| slot.take()) {
                bar.finish_and_clear();
            }
        })),
    };

    let result = DispatchNotificationUseCase::new(backend)
        .execute(record, callbacks)
        .await;

    match &result {
        Ok(output) => {
            presenter.success(&format!(
                "Notification {} sent via {}",
                output.id, output.backend
            ));
        }
        Err(e) => {
            presenter.error(&format!("[{}] {}", backend.name(), e));
        }
    }

    result
}

/// Load configuration, falling back to defaults on any error
pub async fn load_config<S: ConfigStore>(store: &S, presenter: &Presenter) -> AppConfig {
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            let path = store.path();
            warn!(path = %path.display(), error = %e, "ignoring config file");
            presenter.warn(&format!("{} ({}); using defaults", e, path.display()));
            AppConfig::empty()
        }
    };

    // Merge: defaults < file
    AppConfig::defaults().merge(file_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::notification::RecordField;
    use crate::infrastructure::{NotifySendBackend, TelegramBackend};

    #[tokio::test]
    async fn load_config_with_broken_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not = = toml").unwrap();

        let config = load_config(&XdgConfigStore::with_path(&path), &Presenter::new()).await;

        assert_eq!(config.notifier_binary_or_default(), "notify-send");
    }

    #[tokio::test]
    async fn load_config_merges_file_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[telegram]\ntimeout_secs = 7\n").unwrap();

        let config = load_config(&XdgConfigStore::with_path(&path), &Presenter::new()).await;

        assert_eq!(config.telegram_timeout_or_default().as_secs(), 7);
        assert_eq!(config.notifier_binary_or_default(), "notify-send");
    }

    #[tokio::test]
    async fn dispatch_reports_missing_credentials() {
        let backend = Backend::Telegram(TelegramBackend::new());
        let mut record = NotificationRecord::new();
        record.assign(RecordField::Title, "T");

        let result = dispatch(&backend, record, &Presenter::new()).await;

        assert!(matches!(result, Err(SendError::MissingCredentials { .. })));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[tokio::test]
    async fn dispatch_through_local_stub_succeeds() {
        let backend = Backend::Local(NotifySendBackend::with_binary("true"));
        let mut record = NotificationRecord::new();
        record.assign(RecordField::Title, "T");

        let output = dispatch(&backend, record, &Presenter::new()).await.unwrap();

        assert_eq!(output.backend, "local");
    }
}
