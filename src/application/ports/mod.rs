//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod backend;
pub mod config;

// Re-export common types
pub use backend::{
    declare_content_options, ExitReason, NotificationBackend, OptionRegistrar, OptionSpec,
    SendError,
};
pub use config::ConfigStore;
