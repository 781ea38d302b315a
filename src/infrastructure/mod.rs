//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with notify-send, the Telegram Bot API and the config file.

pub mod config;
pub mod notification;

// Re-export adapters
pub use config::XdgConfigStore;
pub use notification::{Backend, NotifySendBackend, TelegramBackend};
