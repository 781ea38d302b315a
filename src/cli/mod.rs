//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, logging setup,
//! and the main application runner.

pub mod app;
pub mod args;
pub mod logging;
pub mod presenter;

// Re-export commonly used types
pub use app::{run, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{build_cli, parse_invocation, ClapRegistrar, GlobalArgs, Invocation};
pub use presenter::Presenter;
