//! notify-cli entry point

use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    notify_cli::cli::run(std::env::args_os()).await
}
