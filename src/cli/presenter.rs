//! CLI presenter for output formatting

use chrono::Local;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::notification::NotificationRecord;

/// Width of the details block border
const DETAILS_WIDTH: usize = 45;

/// Presenter for CLI output formatting
#[derive(Debug, Default)]
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Start a spinner on stderr with message
    pub fn start_spinner(message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        spinner
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print the notification details block to stdout
    pub fn print_details(record: &NotificationRecord) {
        println!("{}", Self::notification_details(record));
    }

    /// Render the bordered details block. Credentials only show as
    /// `<provided>` or `<not set>`.
    pub fn notification_details(record: &NotificationRecord) -> String {
        let separator = "=".repeat(DETAILS_WIDTH);
        let id = record.id.map(|id| id.to_string()).unwrap_or_default();
        let created_at = record
            .created_at
            .map(|at| {
                at.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_default();

        let rows = [
            ("Notification ID", id.as_str()),
            ("Topic", record.topic.as_str()),
            ("Bot Token", record.bot_token.indicator()),
            ("Chat ID", record.chat_id.indicator()),
            ("Created At", created_at.as_str()),
            ("Title", record.payload.title.as_str()),
            ("Body", record.payload.body.as_str()),
            ("Image URL", record.payload.image_url.as_str()),
        ];

        let mut out = format!(
            "\n{}\n{:^width$}\n{}\n",
            separator,
            "NOTIFICATION DETAILS",
            separator,
            width = DETAILS_WIDTH
        );
        for (label, value) in rows {
            out.push_str(&format!(" {:<16} : {}\n", label, value));
        }
        out.push_str(&separator);
        out.push('\n');
        out
    }
}
