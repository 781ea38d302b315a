//! notify-cli - send a notification from the command line
//!
//! One invocation selects exactly one backend (a local desktop notifier or
//! the Telegram Bot API), fills a notification record from the command line
//! and sends it once.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: The notification record, its identity, and configuration
//! - **Application**: The backend port and the dispatch use case
//! - **Infrastructure**: notify-send and Telegram backends, config file store
//! - **CLI**: Argument parsing, output formatting, and logging

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
